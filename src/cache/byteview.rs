//! Byte View Module
//!
//! Immutable snapshot of a cached value's bytes.

use std::fmt;
use std::sync::Arc;

use crate::cache::ByteSize;

// == Byte View ==
/// An immutable view over a value's bytes.
///
/// Clones share the same buffer; every read hands out a fresh copy so
/// callers can never mutate what the cache holds.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ByteView {
    data: Arc<[u8]>,
}

impl ByteView {
    // == Constructors ==
    /// Takes ownership of `bytes` without copying.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { data: bytes.into() }
    }

    /// Copies `bytes` into a new view.
    pub fn copy_from_slice(bytes: &[u8]) -> Self {
        Self { data: Arc::from(bytes) }
    }

    // == Accessors ==
    /// Number of bytes in the view.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a copy of the underlying bytes.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.data.to_vec()
    }
}

impl ByteSize for ByteView {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.data))
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView")
            .field("len", &self.data.len())
            .field("data", &String::from_utf8_lossy(&self.data))
            .finish()
    }
}

impl From<&str> for ByteView {
    fn from(value: &str) -> Self {
        Self::copy_from_slice(value.as_bytes())
    }
}
