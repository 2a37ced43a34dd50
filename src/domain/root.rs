//! Reachability roots: a listed track is kept alive together with its list.

use std::fmt::Display;

use serde::Serialize;

use crate::domain::{identity::UniqueId, list::ListId, track::Track};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "owner", content = "id", rename_all = "lowercase")]
pub enum OpaqueRoot {
    List(ListId),
    Track(UniqueId),
}

impl Display for OpaqueRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpaqueRoot::List(list) => write!(f, "list {list}"),
            OpaqueRoot::Track(track) => write!(f, "track {track}"),
        }
    }
}

/// Resolves a list handle to that list's own root.
pub trait ListRoots {
    fn list_root(&self, list: ListId) -> Option<OpaqueRoot>;
}

impl Track {
    /// The owning list's root, or the track itself when it is not in a list
    pub fn opaque_root(&self, lists: &impl ListRoots) -> OpaqueRoot {
        if let Some(list) = self.track_list() {
            match lists.list_root(list) {
                Some(root) => return root,
                None => log::warn!(
                    "track {:016x} refers to missing list {list}",
                    self.log_identifier()
                ),
            }
        }
        OpaqueRoot::Track(self.unique_id())
    }
}
