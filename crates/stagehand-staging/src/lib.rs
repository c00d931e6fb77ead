//! # stagehand-staging
//!
//! The project-scoped staging protocol: safe creation of a transient
//! working copy of a versioned resource, collision-safe naming when a
//! previous working copy already exists, guaranteed restoration of the
//! ambient project across all exit paths, and best-effort teardown.
//!
//! ## Key components
//!
//! - [`ProjectContext`] — per-session ambient "current project" pointer.
//!   [`ProjectContext::with_project`] is the only mutator: it switches,
//!   runs a body, and restores on every exit path (including panics).
//! - [`NameAllocator`] — stateless name proposer: derives the staging base
//!   name and yields bounded collision-probe candidates.
//! - [`StagingSession`] — per-edit state: original path, staging path,
//!   originating project, and a guarded phase machine.
//! - [`StagingCoordinator`] — the orchestrator: `create_working_copy`,
//!   `commit`, `discard` against any [`ResourceStore`] backend.
//!
//! ```
//! use stagehand_staging::{ProjectContext, StagingCoordinator};
//! use stagehand_store::{
//!     MemoryStore, OwnerId, Project, ProjectKind, ResourceStore,
//! };
//!
//! # fn main() -> Result<(), stagehand_staging::StagingError> {
//! let store = MemoryStore::new();
//! let working = Project::new("Offline", ProjectKind::Working);
//! let transient = Project::new("tempFileProject", ProjectKind::Transient);
//! store.create_resource("/a/doc.txt", working.id, b"v1", Default::default())?;
//!
//! let coordinator = StagingCoordinator::new(store.clone(), transient.id);
//! let mut ctx = ProjectContext::new(OwnerId::new(), working.clone());
//! ctx.register(transient);
//!
//! let mut session = coordinator.create_working_copy(&mut ctx, "/a/doc.txt")?;
//! store.write(session.staging_path().unwrap(), coordinator.transient_project(), b"v2")?;
//! coordinator.commit(&mut ctx, &mut session)?;
//! coordinator.discard(&mut ctx, &mut session)?;
//!
//! assert_eq!(store.read("/a/doc.txt", working.id)?.content, b"v2");
//! # Ok(())
//! # }
//! ```

pub mod allocator;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod session;

pub use allocator::NameAllocator;
pub use context::ProjectContext;
pub use coordinator::StagingCoordinator;
pub use error::StagingError;
pub use session::{SessionPhase, StagingSession};
