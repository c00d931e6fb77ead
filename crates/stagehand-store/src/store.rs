// store.rs — The ResourceStore trait: the seam between the staging
// protocol and whatever persistence engine backs resource storage.
//
// Implementations supply their own interior synchronization; every method
// takes `&self` so a store handle can be shared across sessions. Two
// contract points carry the protocol's correctness under contention:
//
// - `copy` must atomically fail with `AlreadyExists` when the destination
//   path is already bound (compare-and-bind, not check-then-create).
// - `lock` must refuse a second exclusive lock (`LockConflict`), so two
//   sessions can never both hold the same staging copy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::project::ProjectId;
use crate::resource::{OwnerId, Resource};

/// How a copy relates to its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyMode {
    /// The copy is a fully independent resource with its own content
    /// identity. Staging copies are always made this way.
    AsNewResource,
    /// The copy shares the source's underlying content identity, becoming
    /// a sibling of it.
    PreserveSiblings,
}

/// What happens to sibling variants when a resource is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiblingMode {
    /// Delete only the addressed path; siblings survive.
    IgnoreSiblings,
    /// Delete the addressed path and every sibling sharing its content
    /// identity within the project.
    DeleteSiblings,
}

/// The versioned content store consumed by the staging protocol.
///
/// All operations are addressed by hierarchical path and scoped to a
/// project: the same path can be bound to different resources in different
/// projects. Backends map every failure into the closed [`StoreError`] set.
pub trait ResourceStore {
    /// Read the resource bound to `path` in `project`.
    fn read(&self, path: &str, project: ProjectId) -> Result<Resource, StoreError>;

    /// Replace the content of an existing resource.
    fn write(&self, path: &str, project: ProjectId, content: &[u8]) -> Result<(), StoreError>;

    /// Bind a copy of `(src_project, src_path)` to `(dst_project, dst_path)`.
    ///
    /// Fails atomically with `AlreadyExists` if the destination is bound.
    fn copy(
        &self,
        src_path: &str,
        src_project: ProjectId,
        dst_path: &str,
        dst_project: ProjectId,
        mode: CopyMode,
    ) -> Result<(), StoreError>;

    /// Acquire a lock on the resource for `owner`, managed in `project`.
    ///
    /// Re-locking by the same owner upgrades or refreshes the existing
    /// lock. Any other overlap with an exclusive lock is a `LockConflict`.
    fn lock(
        &self,
        path: &str,
        project: ProjectId,
        owner: OwnerId,
        exclusive: bool,
    ) -> Result<(), StoreError>;

    /// Move the lock on `path` (resolved in `from_project`) so that it is
    /// managed by `to_project`.
    ///
    /// An unlocked resource is left untouched and reported as success; an
    /// exclusive lock held by another actor is refused with `LockConflict`.
    fn transfer_lock(
        &self,
        path: &str,
        from_project: ProjectId,
        to_project: ProjectId,
    ) -> Result<(), StoreError>;

    /// Remove the resource bound to `path` in `project`.
    fn delete(
        &self,
        path: &str,
        project: ProjectId,
        siblings: SiblingMode,
    ) -> Result<(), StoreError>;

    /// Read the property mapping of the resource.
    fn read_properties(
        &self,
        path: &str,
        project: ProjectId,
    ) -> Result<BTreeMap<String, String>, StoreError>;

    /// Replace the property mapping of the resource.
    fn write_properties(
        &self,
        path: &str,
        project: ProjectId,
        properties: BTreeMap<String, String>,
    ) -> Result<(), StoreError>;
}

impl<S: ResourceStore + ?Sized> ResourceStore for &S {
    fn read(&self, path: &str, project: ProjectId) -> Result<Resource, StoreError> {
        (**self).read(path, project)
    }

    fn write(&self, path: &str, project: ProjectId, content: &[u8]) -> Result<(), StoreError> {
        (**self).write(path, project, content)
    }

    fn copy(
        &self,
        src_path: &str,
        src_project: ProjectId,
        dst_path: &str,
        dst_project: ProjectId,
        mode: CopyMode,
    ) -> Result<(), StoreError> {
        (**self).copy(src_path, src_project, dst_path, dst_project, mode)
    }

    fn lock(
        &self,
        path: &str,
        project: ProjectId,
        owner: OwnerId,
        exclusive: bool,
    ) -> Result<(), StoreError> {
        (**self).lock(path, project, owner, exclusive)
    }

    fn transfer_lock(
        &self,
        path: &str,
        from_project: ProjectId,
        to_project: ProjectId,
    ) -> Result<(), StoreError> {
        (**self).transfer_lock(path, from_project, to_project)
    }

    fn delete(
        &self,
        path: &str,
        project: ProjectId,
        siblings: SiblingMode,
    ) -> Result<(), StoreError> {
        (**self).delete(path, project, siblings)
    }

    fn read_properties(
        &self,
        path: &str,
        project: ProjectId,
    ) -> Result<BTreeMap<String, String>, StoreError> {
        (**self).read_properties(path, project)
    }

    fn write_properties(
        &self,
        path: &str,
        project: ProjectId,
        properties: BTreeMap<String, String>,
    ) -> Result<(), StoreError> {
        (**self).write_properties(path, project, properties)
    }
}
