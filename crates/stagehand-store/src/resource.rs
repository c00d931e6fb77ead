// resource.rs — Resources, lock state, and path helpers.
//
// A resource is unique per path within a project's visible namespace.
// Copying a resource into another project creates a new resource bound to a
// new path, not a second view of the same entity. Lock owner identity is
// explicit here because there is no ambient request context to hang it off.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::project::ProjectId;

/// Identity of a lock holder — one per editing session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OwnerId(Uuid);

impl OwnerId {
    /// Mint a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lock state of a resource.
///
/// Only one actor may hold an exclusive lock at a time; the store refuses
/// to grant a second one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LockState {
    /// No lock present.
    #[default]
    Unlocked,

    /// Locked by `owner`, managed within `project`.
    Locked {
        project: ProjectId,
        owner: OwnerId,
        exclusive: bool,
    },
}

impl LockState {
    /// True if an exclusive lock is held by someone other than `owner`.
    pub fn excludes(&self, owner: OwnerId) -> bool {
        matches!(
            self,
            LockState::Locked {
                owner: holder,
                exclusive: true,
                ..
            } if *holder != owner
        )
    }
}

/// A versioned content resource as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Opaque store-assigned identity.
    pub id: Uuid,

    /// Hierarchical `/`-separated path within the project's namespace.
    pub path: String,

    /// Content bytes.
    pub content: Vec<u8>,

    /// String-to-string property mapping.
    pub properties: BTreeMap<String, String>,

    /// Current lock state.
    pub lock: LockState,
}

/// Parent folder of a path, including the trailing slash.
///
/// `/a/b/doc.txt` → `/a/b/`. A bare name without a slash has an empty
/// parent.
pub fn parent_folder(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..=idx],
        None => "",
    }
}

/// Final path segment. `/a/b/doc.txt` → `doc.txt`.
pub fn resource_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}
