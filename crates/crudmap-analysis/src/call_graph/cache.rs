//! Memo of call resolutions.

use std::sync::atomic::{AtomicU64, Ordering};

use moka::sync::Cache;

use crudmap_core::types::{ClassId, NameId};

use super::types::CallResolution;

/// Everything resolution depends on. The raw qualifier text is not part of
/// the key, only its simplified form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolveKey {
    pub caller: ClassId,
    pub name: NameId,
    pub arg_count: Option<usize>,
    pub qualifier: Option<String>,
}

/// Resolutions shared across every traversal of one run.
pub struct ResolverCache {
    cache: Cache<ResolveKey, CallResolution>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResolverCache {
    pub fn new(max_entries: u64) -> Self {
        Self {
            cache: Cache::new(max_entries.max(1)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cached resolution for `key`, or compute and remember it.
    pub fn get_or_resolve(
        &self,
        key: ResolveKey,
        resolve: impl FnOnce() -> CallResolution,
    ) -> CallResolution {
        if let Some(hit) = self.cache.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return hit;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let resolution = resolve();
        self.cache.insert(key, resolution.clone());
        resolution
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}
