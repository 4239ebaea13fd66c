//! Peercache - A distributed in-process cache
//!
//! Each node keeps a byte-bounded LRU cache per group and shards keys across
//! peers with consistent hashing; concurrent misses for a key are coalesced
//! into a single load.

pub mod api;
pub mod cache;
pub mod config;
pub mod consistent_hash;
pub mod error;
pub mod group;
pub mod models;
pub mod peers;
pub mod singleflight;

pub use api::AppState;
pub use cache::ByteView;
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{Getter, GetterFn, Group, GroupRegistry};
pub use peers::{HttpPool, PeerGetter, PeerPicker};
