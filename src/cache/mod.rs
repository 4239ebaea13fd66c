//! Cache Module
//!
//! Local storage for a group: byte views, the LRU store and its
//! thread-safe wrapper.

mod byteview;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use byteview::ByteView;
pub use lru::{ByteSize, Keys, LruStore, Observer};
pub use stats::CacheStats;
pub use store::LocalCache;
