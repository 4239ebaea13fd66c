//! Cache Statistics Module
//!
//! Tracks local cache metrics including hits, misses, and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Local cache metrics for one group.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups that found a cached value
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Entries evicted to stay under the byte budget
    pub evictions: u64,
    /// Current number of entries
    pub entries: usize,
    /// Bytes accounted to live entries (keys plus values)
    pub bytes: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Evictions ==
    /// Adds `count` evictions.
    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }
}
