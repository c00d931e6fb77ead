//! # stagehand-store
//!
//! Versioned resource store contract for Stagehand.
//!
//! Defines the data model (projects, resources, locks) and the
//! [`ResourceStore`] trait that the staging protocol consumes. Durable
//! backends (SQL, object storage) live behind the trait; this crate ships
//! [`MemoryStore`], an in-process reference implementation used by tests and
//! by embedders that have no persistence layer yet.
//!
//! ## Key components
//!
//! - [`ResourceStore`] — trait abstracting the versioned content store:
//!   read/write/copy/delete, property access, and lock primitives, all
//!   addressed by hierarchical path and scoped to a project.
//! - [`MemoryStore`] — reference implementation. Honors the two contract
//!   points the staging protocol depends on: atomic compare-and-bind on
//!   copy, and single-writer exclusive locks.
//! - [`StoreError`] — closed error taxonomy so callers can pattern-match
//!   exhaustively instead of inspecting error codes.

pub mod error;
pub mod memory;
pub mod project;
pub mod resource;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use project::{Project, ProjectId, ProjectKind};
pub use resource::{parent_folder, resource_name, LockState, OwnerId, Resource};
pub use store::{CopyMode, ResourceStore, SiblingMode};
