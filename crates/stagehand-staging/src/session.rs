// session.rs — Per-edit staging session state.
//
// One StagingSession exists per edit operation, owned exclusively by the
// coordinator invocation that created it. The phase machine is small and
// strict:
//
//   Allocating → Active → { Committed | Discarded }
//   Allocating → Failed
//
// Terminal phases (Committed, Discarded, Failed) admit no transition.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stagehand_store::ProjectId;

use crate::error::StagingError;

/// Where a staging session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Probing for a free staging name.
    Allocating,
    /// A staging copy is bound and exclusively locked.
    Active,
    /// Staged content was written back to the original.
    Committed,
    /// The staging copy was torn down (or cleanup was attempted).
    Discarded,
    /// Allocation aborted on a fatal error.
    Failed,
}

impl SessionPhase {
    /// Check whether transitioning from this phase to `next` is valid.
    pub fn can_transition_to(self, next: SessionPhase) -> bool {
        matches!(
            (self, next),
            (SessionPhase::Allocating, SessionPhase::Active)
                | (SessionPhase::Allocating, SessionPhase::Failed)
                | (SessionPhase::Active, SessionPhase::Committed)
                | (SessionPhase::Active, SessionPhase::Discarded)
        )
    }

    /// Terminal phases admit no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionPhase::Committed | SessionPhase::Discarded | SessionPhase::Failed
        )
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Allocating => write!(f, "allocating"),
            SessionPhase::Active => write!(f, "active"),
            SessionPhase::Committed => write!(f, "committed"),
            SessionPhase::Discarded => write!(f, "discarded"),
            SessionPhase::Failed => write!(f, "failed"),
        }
    }
}

/// State of one staged edit: which resource is being edited, where its
/// working copy lives, and how far the session has progressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingSession {
    session_id: Uuid,
    original_path: String,
    staging_path: Option<String>,
    originating_project: ProjectId,
    phase: SessionPhase,
    created_at: DateTime<Utc>,
}

impl StagingSession {
    /// Start a session in the `Allocating` phase.
    pub fn new(original_path: impl Into<String>, originating_project: ProjectId) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            original_path: original_path.into(),
            staging_path: None,
            originating_project,
            phase: SessionPhase::Allocating,
            created_at: Utc::now(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Path of the resource being edited.
    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    /// Path of the bound working copy, once allocation succeeded.
    pub fn staging_path(&self) -> Option<&str> {
        self.staging_path.as_deref()
    }

    /// The caller's project at the time the session was created.
    pub fn originating_project(&self) -> ProjectId {
        self.originating_project
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Bind the staging path and move to `Active`.
    pub fn activate(&mut self, staging_path: impl Into<String>) -> Result<(), StagingError> {
        self.transition(SessionPhase::Active)?;
        self.staging_path = Some(staging_path.into());
        Ok(())
    }

    /// Move to `next`, refusing transitions the machine does not allow.
    pub fn transition(&mut self, next: SessionPhase) -> Result<(), StagingError> {
        if !self.phase.can_transition_to(next) {
            return Err(StagingError::PhaseViolation {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }
}
