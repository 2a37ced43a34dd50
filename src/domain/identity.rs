use std::{
    fmt::Display,
    sync::atomic::{AtomicU64, Ordering},
};

use serde::Serialize;

/// Process-unique identity of a track instance.
///
/// Issued by [`IdentityRegistry::next_id`], never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct UniqueId(u64);

impl UniqueId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for UniqueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Numeric id assigned to a track by whatever produced it (demuxer, manifest, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TrackId(pub u64);

impl Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic counter handing out [`UniqueId`]s.
///
/// One registry lives for the whole process (see [`IdentityRegistry::global`]) and is never
/// reset. Tests create their own to stay isolated from each other.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    last: AtomicU64,
}

impl IdentityRegistry {
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    pub fn global() -> &'static IdentityRegistry {
        static GLOBAL: IdentityRegistry = IdentityRegistry::new();
        &GLOBAL
    }

    /// increments the counter by one and returns the new value, the first id is 1
    pub fn next_id(&self) -> UniqueId {
        UniqueId(self.last.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
