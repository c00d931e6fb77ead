// context.rs — Per-session ambient "current project" pointer.
//
// A ProjectContext belongs to exactly one editing session and must never be
// shared between in-flight operations. with_project is the only way the
// pointer moves: it switches, runs a body, and restores the previous
// project on every exit path — normal return, error, or panic. Call sites
// never hand-roll a switch/switch-back pair.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};

use stagehand_store::{OwnerId, Project, ProjectId, ProjectKind};

use crate::error::StagingError;

/// The ambient execution context of one editing session.
///
/// Tracks which project is "current" and which projects the session may
/// switch into. Switching to an unregistered project fails, which is also
/// what makes the restore step genuinely fallible.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Lock-owner identity of this session.
    session: OwnerId,

    /// The currently active project.
    current: ProjectId,

    /// Projects this session is allowed to switch into.
    projects: BTreeMap<ProjectId, Project>,
}

impl ProjectContext {
    /// Create a context with `current` as the active (and only registered)
    /// project.
    pub fn new(session: OwnerId, current: Project) -> Self {
        let id = current.id;
        let mut projects = BTreeMap::new();
        projects.insert(id, current);
        Self {
            session,
            current: id,
            projects,
        }
    }

    /// Make another project switchable from this context.
    pub fn register(&mut self, project: Project) {
        self.projects.insert(project.id, project);
    }

    /// Forget a registered project. Returns it if it was known.
    pub fn deregister(&mut self, id: ProjectId) -> Option<Project> {
        self.projects.remove(&id)
    }

    /// The session's lock-owner identity.
    pub fn session(&self) -> OwnerId {
        self.session
    }

    /// The currently active project id.
    pub fn current(&self) -> ProjectId {
        self.current
    }

    /// Lifecycle kind of a registered project, if known.
    pub fn project_kind(&self, id: ProjectId) -> Option<ProjectKind> {
        self.projects.get(&id).map(|p| p.kind)
    }

    /// Switch the active project, returning the previous one.
    ///
    /// The pointer is left unchanged when the target is unknown.
    pub fn switch(&mut self, target: ProjectId) -> Result<ProjectId, StagingError> {
        if !self.projects.contains_key(&target) {
            return Err(StagingError::UnknownProject { project: target });
        }
        let previous = self.current;
        self.current = target;
        Ok(previous)
    }

    /// Run `body` with `target` as the active project, restoring the
    /// previous project afterwards no matter how `body` exits.
    ///
    /// A panic in `body` resumes unwinding only after the restore has run.
    /// If the restore step itself fails, the result is
    /// [`StagingError::ContextRestoreFailed`] carrying the body's own error
    /// (if it had one) rather than replacing it.
    pub fn with_project<T, F>(&mut self, target: ProjectId, body: F) -> Result<T, StagingError>
    where
        F: FnOnce(&mut ProjectContext) -> Result<T, StagingError>,
    {
        let previous = self.switch(target)?;
        let outcome = catch_unwind(AssertUnwindSafe(|| body(self)));
        let restored = self.switch(previous);

        match outcome {
            Err(panic) => {
                // Restore already ran; let the panic continue.
                resume_unwind(panic)
            }
            Ok(result) => match restored {
                Ok(_) => result,
                Err(restore) => Err(StagingError::ContextRestoreFailed {
                    restore: Box::new(restore),
                    body: result.err().map(Box::new),
                }),
            },
        }
    }
}
