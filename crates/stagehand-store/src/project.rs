// project.rs — Projects: the scoping unit for resource visibility and locks.
//
// Every store call is addressed to a project. Published is the durable,
// externally visible snapshot; Working is the mutable per-tenant draft area;
// Transient is a short-lived scope that only ever hosts staging copies while
// an editor session is open.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a project.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Mint a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ProjectId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What role a project plays in the content lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    /// Durable, publicly visible snapshot of content.
    Published,
    /// Mutable per-tenant draft area, distinct from Published.
    Working,
    /// Short-lived scope used only to host staging copies during an edit.
    Transient,
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectKind::Published => write!(f, "published"),
            ProjectKind::Working => write!(f, "working"),
            ProjectKind::Transient => write!(f, "transient"),
        }
    }
}

/// A project: identity plus lifecycle role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier for this project.
    pub id: ProjectId,

    /// Human-readable name (e.g., "Online", "Offline", "tempFileProject").
    pub name: String,

    /// Lifecycle role of this project.
    pub kind: ProjectKind,
}

impl Project {
    /// Create a project with a fresh id.
    pub fn new(name: impl Into<String>, kind: ProjectKind) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            kind,
        }
    }
}
