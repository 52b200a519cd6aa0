//! Shared cache of resolved mappings.

use crate::config::MappingConfig;
use crate::error::Result;
use crate::mapping::Mapping;
use crate::types::MappingKey;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

/// LRU cache of immutable mappings keyed by (key type, record type).
///
/// Store adapters for the same pair share one `Arc<Mapping>` instead of
/// re-reading the description.
pub struct MappingCache {
    cache: Mutex<LruCache<MappingKey, Arc<Mapping>>>,
}

impl MappingCache {
    /// Create a cache holding at most `capacity` mappings (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn from_config(config: &MappingConfig) -> Self {
        Self::new(config.cache_capacity)
    }

    pub fn get(&self, key: &MappingKey) -> Option<Arc<Mapping>> {
        self.cache.lock().get(key).cloned()
    }

    /// Insert a mapping, replacing any previous one for `key`.
    pub fn insert(&self, key: MappingKey, mapping: Mapping) -> Arc<Mapping> {
        let mapping = Arc::new(mapping);
        self.cache.lock().put(key, Arc::clone(&mapping));
        mapping
    }

    /// Cached mapping for `key`, or the result of `load` (cached on success).
    ///
    /// `load` runs without holding the lock. If another thread cached the
    /// same key in the meantime, its mapping is kept and returned.
    pub fn get_or_load<F>(&self, key: &MappingKey, load: F) -> Result<Arc<Mapping>>
    where
        F: FnOnce() -> Result<Mapping>,
    {
        if let Some(mapping) = self.get(key) {
            debug!(key = %key, "Mapping cache hit");
            return Ok(mapping);
        }

        debug!(key = %key, "Mapping cache miss");
        let loaded = Arc::new(load()?);

        let mut cache = self.cache.lock();
        if let Some(existing) = cache.get(key) {
            return Ok(Arc::clone(existing));
        }
        cache.put(key.clone(), Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Drop the cached mapping for `key`.
    pub fn invalidate(&self, key: &MappingKey) -> Option<Arc<Mapping>> {
        self.cache.lock().pop(key)
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistError;
    use crate::types::{DataType, Field};
    use std::thread;

    fn mapping(container: &str) -> Mapping {
        Mapping::from_parts(
            container,
            [("name".to_string(), Field::new("name", DataType::Text))],
        )
    }

    #[test]
    fn test_get_or_load_caches() {
        let cache = MappingCache::new(4);
        let key = MappingKey::new("K", "R");

        let first = cache.get_or_load(&key, || Ok(mapping("a"))).unwrap();
        let second = cache
            .get_or_load(&key, || panic!("loader must not run on a hit"))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let cache = MappingCache::new(4);
        let key = MappingKey::new("K", "R");

        let result = cache.get_or_load(&key, || Err(PersistError::UnknownFieldType("x".into())));
        assert!(result.is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_eviction() {
        let cache = MappingCache::new(1);
        cache.insert(MappingKey::new("K", "A"), mapping("a"));
        cache.insert(MappingKey::new("K", "B"), mapping("b"));

        assert!(cache.get(&MappingKey::new("K", "A")).is_none());
        assert!(cache.get(&MappingKey::new("K", "B")).is_some());
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let cache = MappingCache::new(0);
        cache.insert(MappingKey::new("K", "A"), mapping("a"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate() {
        let cache = MappingCache::new(4);
        let key = MappingKey::new("K", "A");
        cache.insert(key.clone(), mapping("a"));
        assert!(cache.invalidate(&key).is_some());
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = Arc::new(MappingCache::new(4));
        let key = MappingKey::new("K", "R");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let key = key.clone();
                thread::spawn(move || cache.get_or_load(&key, || Ok(mapping("shared"))).unwrap())
            })
            .collect();

        let results: Vec<Arc<Mapping>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let cached = cache.get(&key).unwrap();
        assert!(results.iter().all(|m| m.container_name() == Some("shared")));
        assert!(results.iter().any(|m| Arc::ptr_eq(m, &cached)));
        assert_eq!(cache.len(), 1);
    }
}
