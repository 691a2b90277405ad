//! Per-method memo of extraction results, shared across entry classes.

use std::sync::Arc;

use moka::sync::Cache;

use crudmap_core::types::MethodId;

use super::types::ExtractedFacts;

/// Extraction results keyed by method.
///
/// Extraction is a pure function of the method text and the catalog, so an
/// entry is valid for the lifetime of one catalog.
pub struct ExtractionCache {
    cache: Cache<MethodId, Arc<ExtractedFacts>>,
}

impl ExtractionCache {
    /// Sized to hold every method of the program without eviction.
    pub fn new(method_count: usize) -> Self {
        Self {
            cache: Cache::new(method_count.max(1) as u64),
        }
    }

    pub fn get(&self, method: MethodId) -> Option<Arc<ExtractedFacts>> {
        self.cache.get(&method)
    }

    pub fn insert(&self, method: MethodId, facts: Arc<ExtractedFacts>) {
        self.cache.insert(method, facts);
    }

    /// Cached facts for `method`, or compute and remember them.
    /// The flag is true on a hit.
    pub fn get_or_extract(
        &self,
        method: MethodId,
        extract: impl FnOnce() -> ExtractedFacts,
    ) -> (Arc<ExtractedFacts>, bool) {
        if let Some(facts) = self.get(method) {
            return (facts, true);
        }
        let facts = Arc::new(extract());
        self.insert(method, Arc::clone(&facts));
        (facts, false)
    }

    /// Number of entries currently in the cache (eventually consistent).
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_lookup_is_a_hit() {
        let cache = ExtractionCache::new(4);
        let id = MethodId::new(3);
        let (first, hit) = cache.get_or_extract(id, ExtractedFacts::default);
        assert!(!hit);
        let (second, hit) = cache.get_or_extract(id, || panic!("must not re-extract"));
        assert!(hit);
        assert!(Arc::ptr_eq(&first, &second));
    }
}
