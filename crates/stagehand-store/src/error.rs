// error.rs — Error types for the resource store.

use thiserror::Error;

/// Errors that can occur during store operations.
///
/// This is a closed set: callers (in particular the staging probe loop)
/// match on variants to decide what is retryable, so a store backend must
/// map every failure into exactly one of these. `AlreadyExists` and
/// `LockConflict` are the only variants a caller may treat as recoverable.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No resource is bound to the path in the addressed project.
    #[error("resource not found: '{path}'")]
    NotFound { path: String },

    /// A bind attempt hit a path that is already occupied.
    #[error("resource already exists: '{path}'")]
    AlreadyExists { path: String },

    /// An exclusive lock is held by someone else.
    #[error("lock conflict on '{path}'")]
    LockConflict { path: String },

    /// Store-level I/O or consistency failure. Always fatal to the caller.
    #[error("persistence failure at '{path}': {message}")]
    Persistence { path: String, message: String },
}

impl StoreError {
    /// True for the collision/conflict class that drives name probing.
    pub fn is_collision(&self) -> bool {
        matches!(
            self,
            StoreError::AlreadyExists { .. } | StoreError::LockConflict { .. }
        )
    }
}
