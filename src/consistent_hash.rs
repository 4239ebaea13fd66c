//! Consistent Hash Module
//!
//! Maps keys onto a ring of peers, each placed at several virtual positions.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Hash function used to place peers and keys on the ring.
pub type HashFn = fn(&[u8]) -> u32;

/// Virtual positions per peer when none is specified.
pub const DEFAULT_REPLICAS: usize = 50;

// == Hash Ring ==
/// Consistent hash ring.
///
/// Every real peer occupies `replicas` positions, at `hash(i + peer)` for
/// `i` in `0..replicas`. A key belongs to the peer owning the first
/// position at or after the key's hash, wrapping to the smallest position.
#[derive(Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted virtual positions
    positions: Vec<u32>,
    /// Claims on each virtual position, in the order peers were added.
    /// The most recent claim owns the position.
    owners: HashMap<u32, Vec<String>>,
    /// Registered real peers
    peers: BTreeSet<String>,
}

impl HashRing {
    // == Constructors ==
    /// Creates an empty ring using CRC-32 (IEEE) for placement.
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, crc32fast::hash)
    }

    /// Creates an empty ring with a custom hash function.
    pub fn with_hasher(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas: replicas.max(1),
            positions: Vec::new(),
            owners: HashMap::new(),
            peers: BTreeSet::new(),
        }
    }

    // == Add ==
    /// Places each peer on the ring.
    ///
    /// Re-adding a peer that is already present is a no-op.
    pub fn add<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for peer in peers {
            let peer = peer.into();
            if !self.peers.insert(peer.clone()) {
                continue;
            }
            for i in 0..self.replicas {
                let position = (self.hash)(format!("{}{}", i, peer).as_bytes());
                self.positions.push(position);
                self.owners.entry(position).or_default().push(peer.clone());
            }
        }
        self.positions.sort_unstable();
        self.positions.dedup();
    }

    // == Remove ==
    /// Takes a peer off the ring. Returns false if it was not registered.
    ///
    /// Keys owned by other peers keep their owner. A position shared with
    /// another peer stays on the ring under the remaining claim.
    pub fn remove(&mut self, peer: &str) -> bool {
        if !self.peers.remove(peer) {
            return false;
        }
        self.owners.retain(|_, claims| {
            claims.retain(|owner| owner != peer);
            !claims.is_empty()
        });
        self.positions.retain(|position| self.owners.contains_key(position));
        true
    }

    // == Get ==
    /// Returns the peer owning `key`, or `None` on an empty ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.positions.is_empty() {
            return None;
        }
        let hash = (self.hash)(key.as_bytes());
        let idx = self.positions.partition_point(|&position| position < hash);
        let position = self.positions[idx % self.positions.len()];
        self.owners
            .get(&position)
            .and_then(|claims| claims.last())
            .map(String::as_str)
    }

    // == Accessors ==
    /// Number of real peers on the ring.
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn contains(&self, peer: &str) -> bool {
        self.peers.contains(peer)
    }

    /// Registered peers in sorted order.
    pub fn peers(&self) -> impl Iterator<Item = &str> {
        self.peers.iter().map(String::as_str)
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("peers", &self.peers)
            .field("positions", &self.positions.len())
            .finish()
    }
}
