// memory.rs — In-memory ResourceStore implementation.
//
// State lives behind one Arc<Mutex<..>>, so a cloned handle shares the same
// store and every trait method is a single critical section. That is what
// makes copy's compare-and-bind and lock's single-writer guarantee atomic
// here; a durable backend would lean on its own transaction machinery
// instead.
//
// Sibling model: each resource carries a content identity shared by copies
// made with CopyMode::PreserveSiblings. Sibling relationships only matter
// to delete — DeleteSiblings removes every same-project resource sharing
// the content identity.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::error::StoreError;
use crate::project::ProjectId;
use crate::resource::{LockState, OwnerId, Resource};
use crate::store::{CopyMode, ResourceStore, SiblingMode};

#[derive(Debug, Clone)]
struct StoredResource {
    id: Uuid,
    content_id: Uuid,
    content: Vec<u8>,
    properties: BTreeMap<String, String>,
    lock: LockState,
}

#[derive(Debug, Default)]
struct Inner {
    resources: HashMap<(ProjectId, String), StoredResource>,
}

/// In-memory reference implementation of [`ResourceStore`].
///
/// Cloning yields a second handle to the same store, so one instance can be
/// shared across concurrent editing sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a brand-new resource, for seeding content into a project.
    ///
    /// Fails with `AlreadyExists` if the path is already bound.
    pub fn create_resource(
        &self,
        path: &str,
        project: ProjectId,
        content: &[u8],
        properties: BTreeMap<String, String>,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock_inner()?;
        let key = (project, path.to_string());
        if inner.resources.contains_key(&key) {
            return Err(StoreError::AlreadyExists { path: path.into() });
        }
        inner.resources.insert(
            key,
            StoredResource {
                id: Uuid::new_v4(),
                content_id: Uuid::new_v4(),
                content: content.to_vec(),
                properties,
                lock: LockState::Unlocked,
            },
        );
        Ok(())
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Persistence {
            path: String::new(),
            message: "store mutex poisoned".into(),
        })
    }
}

impl Inner {
    fn get(&self, path: &str, project: ProjectId) -> Result<&StoredResource, StoreError> {
        self.resources
            .get(&(project, path.to_string()))
            .ok_or_else(|| StoreError::NotFound { path: path.into() })
    }

    fn get_mut(
        &mut self,
        path: &str,
        project: ProjectId,
    ) -> Result<&mut StoredResource, StoreError> {
        self.resources
            .get_mut(&(project, path.to_string()))
            .ok_or_else(|| StoreError::NotFound { path: path.into() })
    }
}

impl ResourceStore for MemoryStore {
    fn read(&self, path: &str, project: ProjectId) -> Result<Resource, StoreError> {
        let inner = self.lock_inner()?;
        let stored = inner.get(path, project)?;
        Ok(Resource {
            id: stored.id,
            path: path.to_string(),
            content: stored.content.clone(),
            properties: stored.properties.clone(),
            lock: stored.lock,
        })
    }

    fn write(&self, path: &str, project: ProjectId, content: &[u8]) -> Result<(), StoreError> {
        let mut inner = self.lock_inner()?;
        let stored = inner.get_mut(path, project)?;
        stored.content = content.to_vec();
        Ok(())
    }

    fn copy(
        &self,
        src_path: &str,
        src_project: ProjectId,
        dst_path: &str,
        dst_project: ProjectId,
        mode: CopyMode,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock_inner()?;
        // Source lookup and destination bind happen under the same guard,
        // so the exists-check cannot race with another bind.
        let src = inner.get(src_path, src_project)?.clone();
        let key = (dst_project, dst_path.to_string());
        if inner.resources.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                path: dst_path.into(),
            });
        }
        let content_id = match mode {
            CopyMode::AsNewResource => Uuid::new_v4(),
            CopyMode::PreserveSiblings => src.content_id,
        };
        inner.resources.insert(
            key,
            StoredResource {
                id: Uuid::new_v4(),
                content_id,
                content: src.content,
                properties: src.properties,
                lock: LockState::Unlocked,
            },
        );
        Ok(())
    }

    fn lock(
        &self,
        path: &str,
        project: ProjectId,
        owner: OwnerId,
        exclusive: bool,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock_inner()?;
        let stored = inner.get_mut(path, project)?;
        match stored.lock {
            LockState::Unlocked => {}
            LockState::Locked {
                owner: holder,
                exclusive: held_exclusive,
                ..
            } => {
                // Same owner may refresh or upgrade; anyone else conflicts
                // whenever either side wants exclusivity.
                if holder != owner && (held_exclusive || exclusive) {
                    return Err(StoreError::LockConflict { path: path.into() });
                }
            }
        }
        stored.lock = LockState::Locked {
            project,
            owner,
            exclusive,
        };
        Ok(())
    }

    fn transfer_lock(
        &self,
        path: &str,
        from_project: ProjectId,
        to_project: ProjectId,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock_inner()?;
        let stored = inner.get_mut(path, from_project)?;
        match stored.lock {
            // Nothing to transfer; the resource is free for the taking.
            LockState::Unlocked => Ok(()),
            LockState::Locked {
                exclusive: true, ..
            } => Err(StoreError::LockConflict { path: path.into() }),
            LockState::Locked {
                owner, exclusive, ..
            } => {
                stored.lock = LockState::Locked {
                    project: to_project,
                    owner,
                    exclusive,
                };
                Ok(())
            }
        }
    }

    fn delete(
        &self,
        path: &str,
        project: ProjectId,
        siblings: SiblingMode,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock_inner()?;
        let key = (project, path.to_string());
        let removed = inner
            .resources
            .remove(&key)
            .ok_or_else(|| StoreError::NotFound { path: path.into() })?;
        if let SiblingMode::DeleteSiblings = siblings {
            inner.resources.retain(|(p, _), stored| {
                *p != project || stored.content_id != removed.content_id
            });
        }
        Ok(())
    }

    fn read_properties(
        &self,
        path: &str,
        project: ProjectId,
    ) -> Result<BTreeMap<String, String>, StoreError> {
        let inner = self.lock_inner()?;
        Ok(inner.get(path, project)?.properties.clone())
    }

    fn write_properties(
        &self,
        path: &str,
        project: ProjectId,
        properties: BTreeMap<String, String>,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock_inner()?;
        inner.get_mut(path, project)?.properties = properties;
        Ok(())
    }
}
