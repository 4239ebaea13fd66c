//! Group Module
//!
//! A named cache that combines local storage, peer routing and a source
//! loader behind a single `get`.
//!
//! # Read path
//! 1. Reject empty keys
//! 2. Serve from the local cache on a hit
//! 3. On a miss, coalesce concurrent loads of the key
//! 4. Ask the peer picker for an owner and fetch from it
//! 5. Fall back to the source loader and cache the result

mod getter;
mod registry;
mod stats;

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, info, warn};

use crate::cache::{ByteView, CacheStats, LocalCache};
use crate::error::{CacheError, Result};
use crate::peers::{PeerGetter, PeerPicker};
use crate::singleflight::{Role, SingleFlight};

pub use getter::{AsyncGetterFn, Getter, GetterFn};
pub use registry::GroupRegistry;
pub use stats::{GroupStats, GroupStatsSnapshot};

// == Group ==
/// A named cache namespace.
pub struct Group {
    name: String,
    getter: Arc<dyn Getter>,
    main_cache: LocalCache,
    /// Set at most once
    peers: OnceLock<Arc<dyn PeerPicker>>,
    loader: SingleFlight<ByteView>,
    stats: GroupStats,
}

impl Group {
    // == Constructor ==
    /// Creates an unregistered group holding at most `cache_bytes` bytes locally.
    ///
    /// Most callers go through [`GroupRegistry::new_group`] instead.
    pub fn new(name: impl Into<String>, cache_bytes: usize, getter: Arc<dyn Getter>) -> Self {
        Self {
            name: name.into(),
            getter,
            main_cache: LocalCache::new(cache_bytes),
            peers: OnceLock::new(),
            loader: SingleFlight::new(),
            stats: GroupStats::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Register Peers ==
    /// Attaches the peer picker used to route misses.
    ///
    /// Fails with `AlreadyRegistered` if a picker is already attached.
    pub fn register_peers(&self, picker: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers.set(picker).map_err(|_| {
            CacheError::AlreadyRegistered(format!("peer picker for group '{}'", self.name))
        })
    }

    // == Get ==
    /// Returns the value for `key`, loading it from a peer or the source on a miss.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        self.stats.record_get();
        if key.is_empty() {
            return Err(CacheError::InvalidArgument("empty key".to_string()));
        }

        if let Some(value) = self.main_cache.get(key) {
            debug!(group = %self.name, key, "cache hit");
            self.stats.record_cache_hit();
            return Ok(value);
        }

        self.load(key).await
    }

    // == Load ==
    /// Runs the miss path once per key no matter how many callers race on it.
    async fn load(&self, key: &str) -> Result<ByteView> {
        let (result, role) = self
            .loader
            .work_with_role(key, || async {
                self.stats.record_load();

                if let Some(peer) = self.peers.get().and_then(|picker| picker.pick(key)) {
                    match self.get_from_peer(peer.as_ref(), key).await {
                        Ok(value) => {
                            self.stats.record_peer_load();
                            return Ok(value);
                        }
                        Err(err) => {
                            self.stats.record_peer_error();
                            warn!(group = %self.name, key, error = %err, "peer fetch failed, loading locally");
                        }
                    }
                }

                self.get_locally(key).await
            })
            .await;

        if role == Role::Follower {
            self.stats.record_coalesced();
        }
        result
    }

    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let bytes = peer.get(&self.name, key).await?;
        Ok(ByteView::from_vec(bytes))
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = match self.getter.get(key).await {
            Ok(bytes) => bytes,
            Err(err) => {
                self.stats.record_local_load_error();
                warn!(group = %self.name, key, error = %err, "source load failed");
                return Err(CacheError::source_load(err));
            }
        };

        info!(group = %self.name, key, bytes = bytes.len(), "loaded from source");
        self.stats.record_local_load();
        let value = ByteView::copy_from_slice(&bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.set(key, value);
    }

    // == Stats ==
    pub fn stats(&self) -> GroupStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.main_cache.stats()
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("cache_bytes", &self.main_cache.cache_bytes())
            .field("has_peers", &self.peers.get().is_some())
            .finish()
    }
}
