// error.rs — Error types for the staging protocol.

use thiserror::Error;

use stagehand_store::{ProjectId, StoreError};

use crate::session::SessionPhase;

/// Errors that can occur during staging operations.
#[derive(Debug, Error)]
pub enum StagingError {
    /// A store operation failed. Collision-class variants
    /// (`AlreadyExists`, `LockConflict`) never escape the probe loop;
    /// anything else surfacing here is fatal.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The target project was never registered with this context.
    #[error("unknown project {project}")]
    UnknownProject { project: ProjectId },

    /// The collision-probe cap was reached without binding a staging name.
    #[error("staging name allocation exhausted after {attempts} probes at '{base}'")]
    AllocationExhausted { base: String, attempts: usize },

    /// An operation was attempted in a session phase that does not allow it.
    #[error("invalid session phase transition from {from} to {to}")]
    PhaseViolation { from: SessionPhase, to: SessionPhase },

    /// Restoring the ambient project failed after a body operation.
    ///
    /// Losing track of the ambient project is a more severe fault than the
    /// operation's own failure, so this wraps the body's error (if any)
    /// instead of discarding it.
    #[error("failed to restore project context: {restore}")]
    ContextRestoreFailed {
        /// The failure of the restore step itself.
        restore: Box<StagingError>,
        /// Whatever the body had already failed with, preserved.
        body: Option<Box<StagingError>>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_failure_preserves_body_error() {
        let body = StagingError::Store(StoreError::NotFound {
            path: "/a/doc.txt".into(),
        });
        let err = StagingError::ContextRestoreFailed {
            restore: Box::new(StagingError::UnknownProject {
                project: ProjectId::new(),
            }),
            body: Some(Box::new(body)),
        };
        let rendered = err.to_string();
        assert!(rendered.starts_with("failed to restore project context"));
        match err {
            StagingError::ContextRestoreFailed { body: Some(inner), .. } => {
                assert!(matches!(
                    *inner,
                    StagingError::Store(StoreError::NotFound { .. })
                ));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
