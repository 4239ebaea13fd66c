//! Local Cache Module
//!
//! Thread-safe, lazily-initialized wrapper around a byte-bounded LRU store.

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{ByteView, CacheStats, LruStore};

// == Local Cache ==
/// Mutex-guarded LRU store holding one group's values.
///
/// The store is only allocated by the first `set`; reads against a cache
/// that was never written are plain misses. The lock is held for the
/// in-memory operation only.
#[derive(Debug)]
pub struct LocalCache {
    /// Byte budget handed to the store when it is created
    cache_bytes: usize,
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    lru: Option<LruStore<ByteView>>,
    stats: CacheStats,
}

impl LocalCache {
    // == Constructor ==
    /// Creates a cache that will hold at most `cache_bytes` bytes (0 = unbounded).
    pub fn new(cache_bytes: usize) -> Self {
        Self {
            cache_bytes,
            inner: Mutex::new(Inner::default()),
        }
    }

    // == Get ==
    /// Looks up `key`, promoting it on a hit.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut inner = self.inner.lock();
        let Inner { lru, stats } = &mut *inner;

        match lru.as_mut().and_then(|lru| lru.get(key)).cloned() {
            Some(value) => {
                stats.record_hit();
                Some(value)
            }
            None => {
                stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key`, creating the store on first use.
    pub fn set(&self, key: &str, value: ByteView) {
        let mut inner = self.inner.lock();
        let Inner { lru, stats } = &mut *inner;

        let lru = lru.get_or_insert_with(|| {
            debug!(cache_bytes = self.cache_bytes, "allocating local cache");
            LruStore::new(self.cache_bytes)
                .with_insert_observer(Box::new(|key: &str, value: &ByteView| {
                    debug!(key, bytes = value.len(), "cache insert");
                }))
                .with_evict_observer(Box::new(|key: &str, value: &ByteView| {
                    debug!(key, bytes = value.len(), "cache evict");
                }))
        });

        let evicted = lru.set(key, value);
        stats.record_evictions(evicted);
    }

    // == Stats ==
    /// Snapshot of counters plus current occupancy.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        if let Some(lru) = &inner.lru {
            stats.entries = lru.len();
            stats.bytes = lru.current_size();
        }
        stats
    }

    /// Whether the underlying store has been allocated yet.
    pub fn is_initialized(&self) -> bool {
        self.inner.lock().lru.is_some()
    }

    pub fn cache_bytes(&self) -> usize {
        self.cache_bytes
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_read_does_not_allocate() {
        let cache = LocalCache::new(1024);

        assert!(cache.get("missing").is_none());
        assert!(!cache.is_initialized());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_set_allocates_and_get_hits() {
        let cache = LocalCache::new(1024);
        cache.set("Tom", ByteView::from("630"));

        assert!(cache.is_initialized());
        assert_eq!(cache.get("Tom"), Some(ByteView::from("630")));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.bytes, 6);
    }

    #[test]
    fn test_evictions_are_counted() {
        // room for two 4-byte entries
        let cache = LocalCache::new(9);
        cache.set("k1", ByteView::from("v1"));
        cache.set("k2", ByteView::from("v2"));
        cache.set("k3", ByteView::from("v3"));

        let stats = cache.stats();
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.entries, 2);
        assert!(cache.get("k1").is_none());
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(LocalCache::new(0));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let key = format!("t{}-{}", t, i);
                        cache.set(&key, ByteView::from(key.as_str()));
                        assert!(cache.get(&key).is_some());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = cache.stats();
        assert_eq!(stats.entries, 800);
        assert_eq!(stats.hits, 800);
    }
}
