//! Peers Module
//!
//! Capabilities a group uses to route keys to the node that owns them.
//!
//! # Capabilities
//! - [`PeerPicker`] - decides which peer owns a key
//! - [`PeerGetter`] - fetches a key from that peer
//!
//! [`HttpPool`] provides both over HTTP.

mod http;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub use http::{HttpGetter, HttpPool};

// == Peer Picker ==
/// Chooses the peer responsible for a key.
///
/// Must be safe to call from many tasks at once.
pub trait PeerPicker: Send + Sync {
    /// Returns the owning peer, or `None` when this node owns the key or
    /// no peers are known.
    fn pick(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

// == Peer Getter ==
/// Fetches a value for `key` in `group` from a remote node.
///
/// Failures come back as [`CacheError::PeerFetch`](crate::error::CacheError::PeerFetch).
#[async_trait]
pub trait PeerGetter: Send + Sync {
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>>;
}
