//! Group Statistics Module
//!
//! Lock-free counters describing how a group's reads were served.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Group Stats ==
/// Live counters, updated from any task.
#[derive(Debug, Default)]
pub struct GroupStats {
    gets: AtomicU64,
    cache_hits: AtomicU64,
    loads: AtomicU64,
    loads_coalesced: AtomicU64,
    peer_loads: AtomicU64,
    peer_errors: AtomicU64,
    local_loads: AtomicU64,
    local_load_errors: AtomicU64,
}

/// Point-in-time copy of [`GroupStats`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupStatsSnapshot {
    /// Every `get`, including invalid ones
    pub gets: u64,
    /// Served straight from the local cache
    pub cache_hits: u64,
    /// Misses that ran the load path (one per coalesced batch)
    pub loads: u64,
    /// Misses that waited on another caller's load
    pub loads_coalesced: u64,
    /// Values fetched from an owning peer
    pub peer_loads: u64,
    /// Peer fetches that failed and fell back to the source
    pub peer_errors: u64,
    /// Values fetched from the source of truth
    pub local_loads: u64,
    /// Source loads that failed
    pub local_load_errors: u64,
}

impl GroupStats {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Counters ==
    pub fn record_get(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_coalesced(&self) {
        self.loads_coalesced.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_peer_load(&self) {
        self.peer_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_peer_error(&self) {
        self.peer_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_local_load(&self) {
        self.local_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_local_load_error(&self) {
        self.local_load_errors.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    pub fn snapshot(&self) -> GroupStatsSnapshot {
        GroupStatsSnapshot {
            gets: self.gets.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            loads_coalesced: self.loads_coalesced.load(Ordering::Relaxed),
            peer_loads: self.peer_loads.load(Ordering::Relaxed),
            peer_errors: self.peer_errors.load(Ordering::Relaxed),
            local_loads: self.local_loads.load(Ordering::Relaxed),
            local_load_errors: self.local_load_errors.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let stats = GroupStats::new();
        stats.record_get();
        stats.record_get();
        stats.record_cache_hit();
        stats.record_load();
        stats.record_peer_error();
        stats.record_local_load();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.gets, 2);
        assert_eq!(snapshot.cache_hits, 1);
        assert_eq!(snapshot.loads, 1);
        assert_eq!(snapshot.peer_errors, 1);
        assert_eq!(snapshot.local_loads, 1);
        assert_eq!(snapshot.peer_loads, 0);
        assert_eq!(snapshot.local_load_errors, 0);
    }
}
