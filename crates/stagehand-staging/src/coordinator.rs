// coordinator.rs — The staging orchestrator.
//
// create_working_copy copies a resource into the transient project under a
// collision-probed name and locks it; commit writes the staged content and
// properties back onto the original; discard tears the copy down
// best-effort. Every store interaction that must happen "inside" the
// transient project runs under ProjectContext::with_project, so the
// caller's ambient project is restored on every exit path.
//
// Error discipline: only AlreadyExists (from copy) and LockConflict (from
// the orphan-reuse attempt) keep the probe loop going. Everything else is
// fatal and propagates after context restoration — a persistence failure
// must never be mistaken for a harmless collision.

use std::collections::BTreeMap;

use stagehand_store::{CopyMode, OwnerId, ProjectId, ResourceStore, SiblingMode, StoreError};

use crate::allocator::{NameAllocator, DEFAULT_PROBE_CAP};
use crate::context::ProjectContext;
use crate::error::StagingError;
use crate::session::{SessionPhase, StagingSession};

/// Orchestrates the staging lifecycle against a [`ResourceStore`] backend.
///
/// The coordinator adds no mutual exclusion of its own: two sessions
/// contending for the same original are serialized by the store's atomic
/// copy bind and exclusive locks alone.
pub struct StagingCoordinator<S> {
    store: S,
    transient_project: ProjectId,
    probe_cap: usize,
}

impl<S: ResourceStore> StagingCoordinator<S> {
    /// Create a coordinator staging into `transient_project`.
    pub fn new(store: S, transient_project: ProjectId) -> Self {
        Self {
            store,
            transient_project,
            probe_cap: DEFAULT_PROBE_CAP,
        }
    }

    /// Override the collision-probe cap.
    pub fn with_probe_cap(mut self, probe_cap: usize) -> Self {
        self.probe_cap = probe_cap;
        self
    }

    /// The project hosting staging copies. Editors address the working
    /// copy through the store with this project id and the session's
    /// staging path.
    pub fn transient_project(&self) -> ProjectId {
        self.transient_project
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create an exclusively locked working copy of `original_path`.
    ///
    /// The original must exist in the caller's current project. The copy is
    /// bound in the transient project under the first free probed name; an
    /// unlocked leftover copy from an interrupted session is taken over and
    /// reused instead of allocating a fresh name next to it.
    pub fn create_working_copy(
        &self,
        ctx: &mut ProjectContext,
        original_path: &str,
    ) -> Result<StagingSession, StagingError> {
        let originating = ctx.current();
        // The original must exist before anything is staged.
        self.store.read(original_path, originating)?;

        let base = NameAllocator::staging_base(original_path);
        let mut session = StagingSession::new(original_path, originating);
        let owner = ctx.session();

        let bound = ctx.with_project(self.transient_project, |c| {
            let mut attempts = 0usize;
            for candidate in NameAllocator::candidates(&base).take(self.probe_cap) {
                attempts += 1;
                match self.store.copy(
                    original_path,
                    originating,
                    &candidate,
                    c.current(),
                    CopyMode::AsNewResource,
                ) {
                    Ok(()) => match self.store.lock(&candidate, c.current(), owner, true) {
                        Ok(()) => {
                            tracing::debug!(path = %candidate, attempts, "bound staging copy");
                            return Ok(candidate);
                        }
                        Err(StoreError::LockConflict { .. }) => {
                            // Another session claimed the fresh copy between
                            // bind and lock. Leave it to them and probe on.
                            tracing::debug!(path = %candidate, "fresh copy claimed elsewhere, probing next");
                        }
                        Err(fatal) => return Err(fatal.into()),
                    },
                    Err(StoreError::AlreadyExists { .. }) => {
                        // Possibly an orphan from an interrupted session —
                        // try to take it over before probing further.
                        match self.try_reuse(&candidate, c, owner) {
                            Ok(()) => {
                                tracing::debug!(path = %candidate, "reusing orphaned staging copy");
                                return Ok(candidate);
                            }
                            Err(
                                StoreError::LockConflict { .. } | StoreError::NotFound { .. },
                            ) => {
                                tracing::debug!(path = %candidate, "staging name busy, probing next");
                            }
                            Err(fatal) => return Err(fatal.into()),
                        }
                    }
                    Err(fatal) => return Err(fatal.into()),
                }
            }
            Err(StagingError::AllocationExhausted {
                base: base.clone(),
                attempts,
            })
        });

        match bound {
            Ok(staging_path) => {
                session.activate(staging_path)?;
                Ok(session)
            }
            Err(err) => {
                session.transition(SessionPhase::Failed)?;
                tracing::debug!(
                    session = %session.session_id(),
                    error = %err,
                    "staging allocation failed"
                );
                Err(err)
            }
        }
    }

    /// Take over an existing staging copy: pull its lock into the session's
    /// management, then lock it exclusively.
    fn try_reuse(
        &self,
        candidate: &str,
        ctx: &ProjectContext,
        owner: OwnerId,
    ) -> Result<(), StoreError> {
        self.store
            .transfer_lock(candidate, ctx.current(), ctx.current())?;
        self.store.lock(candidate, ctx.current(), owner, true)
    }

    /// Write the staged content and properties back onto the original.
    ///
    /// The staging copy is read under the transient project (where it is
    /// visible); the original is written in the caller's own project, after
    /// the context has been restored, so the store's normal versioning and
    /// locking for that project applies. Content and properties are two
    /// separate store writes with no rollback between them.
    pub fn commit(
        &self,
        ctx: &mut ProjectContext,
        session: &mut StagingSession,
    ) -> Result<(), StagingError> {
        let staging_path = match (session.phase(), session.staging_path()) {
            (SessionPhase::Active, Some(path)) => path.to_string(),
            _ => {
                return Err(StagingError::PhaseViolation {
                    from: session.phase(),
                    to: SessionPhase::Committed,
                })
            }
        };

        let (content, properties): (Vec<u8>, BTreeMap<String, String>) =
            ctx.with_project(self.transient_project, |c| {
                let staged = self.store.read(&staging_path, c.current())?;
                let properties = self.store.read_properties(&staging_path, c.current())?;
                Ok((staged.content, properties))
            })?;

        self.store
            .write(session.original_path(), ctx.current(), &content)?;
        self.store
            .write_properties(session.original_path(), ctx.current(), properties)?;

        session.transition(SessionPhase::Committed)?;
        tracing::debug!(
            session = %session.session_id(),
            path = %session.original_path(),
            "committed staged content"
        );
        Ok(())
    }

    /// Best-effort teardown of the working copy.
    ///
    /// Store errors from the delete (including NotFound) are logged and
    /// swallowed — cleanup must never block session teardown. An `Active`
    /// session becomes `Discarded` regardless of the delete outcome;
    /// calling discard again afterwards is a no-op.
    pub fn discard(
        &self,
        ctx: &mut ProjectContext,
        session: &mut StagingSession,
    ) -> Result<(), StagingError> {
        let staging_path = match (session.phase(), session.staging_path()) {
            (SessionPhase::Active | SessionPhase::Committed, Some(path)) => path.to_string(),
            // Nothing bound, or already torn down.
            _ => return Ok(()),
        };

        ctx.with_project(self.transient_project, |c| {
            if let Err(err) =
                self.store
                    .delete(&staging_path, c.current(), SiblingMode::IgnoreSiblings)
            {
                tracing::warn!(
                    session = %session.session_id(),
                    path = %staging_path,
                    error = %err,
                    "staging cleanup failed, continuing"
                );
            }
            Ok(())
        })?;

        if session.phase() == SessionPhase::Active {
            session.transition(SessionPhase::Discarded)?;
        }
        Ok(())
    }
}
