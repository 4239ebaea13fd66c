//! HTTP Peer Transport
//!
//! Picks owners with a consistent hash ring and fetches from them over HTTP.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{StatusCode, Url};
use tracing::{debug, info};

use crate::consistent_hash::HashRing;
use crate::error::{CacheError, Result};
use crate::peers::{PeerGetter, PeerPicker};

// == HTTP Getter ==
/// Client for one remote node's peer endpoint.
///
/// Requests `GET {base_url}/{group}/get/{key}`, where `base_url` already
/// includes the namespace.
#[derive(Debug, Clone)]
pub struct HttpGetter {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGetter {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the request URL with group and key percent-encoded as path segments.
    fn url_for(&self, group: &str, key: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CacheError::PeerFetch(format!("bad peer url {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| CacheError::PeerFetch(format!("peer url {} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .push(group)
            .push("get")
            .push(key);
        Ok(url)
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>> {
        let url = self.url_for(group, key)?;
        debug!(%url, "fetching from peer");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CacheError::PeerFetch(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(CacheError::PeerFetch(format!(
                "server returned: {}",
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CacheError::PeerFetch(format!("reading response body: {}", e)))?;
        Ok(body.to_vec())
    }
}

// == Peer Table ==
/// Immutable ring plus a client per peer; replaced wholesale on membership change.
#[derive(Debug)]
struct PeerTable {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

// == HTTP Pool ==
/// HTTP-backed [`PeerPicker`].
///
/// Routing reads take a snapshot of the current table; membership changes
/// build a new table and publish it in one swap, so a `pick` never sees a
/// half-updated ring.
#[derive(Debug)]
pub struct HttpPool {
    /// This node's base URL, as it appears on the ring
    self_url: String,
    /// Path prefix of the peer endpoint
    namespace: String,
    replicas: usize,
    client: reqwest::Client,
    table: RwLock<Arc<PeerTable>>,
}

impl HttpPool {
    // == Constructor ==
    /// Creates a pool with no peers; every key is owned locally until
    /// [`set_peers`](Self::set_peers) is called.
    pub fn new(self_url: impl Into<String>, namespace: impl Into<String>, replicas: usize) -> Self {
        Self {
            self_url: trim_url(self_url.into()),
            namespace: namespace.into().trim_matches('/').to_string(),
            replicas,
            client: reqwest::Client::new(),
            table: RwLock::new(Arc::new(PeerTable {
                ring: HashRing::new(replicas),
                getters: HashMap::new(),
            })),
        }
    }

    pub fn self_url(&self) -> &str {
        &self.self_url
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    // == Set Peers ==
    /// Replaces the membership with `peers` (base URLs, this node included).
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let peers: Vec<String> = peers.into_iter().map(|p| trim_url(p.into())).collect();

        let mut ring = HashRing::new(self.replicas);
        ring.add(peers.iter().cloned());

        let getters = peers
            .iter()
            .map(|peer| {
                let base_url = format!("{}/{}", peer, self.namespace);
                (peer.clone(), Arc::new(HttpGetter::new(base_url, self.client.clone())))
            })
            .collect();

        *self.table.write() = Arc::new(PeerTable { ring, getters });
        info!(self_url = %self.self_url, peers = ?peers, "peer set updated");
    }

    /// Current members in sorted order.
    pub fn peers(&self) -> Vec<String> {
        let table = self.table.read().clone();
        table.ring.peers().map(str::to_string).collect()
    }

    /// Ring owner of `key`, which may be this node.
    pub fn owner(&self, key: &str) -> Option<String> {
        let table = self.table.read().clone();
        table.ring.get(key).map(str::to_string)
    }
}

impl PeerPicker for HttpPool {
    fn pick(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let table = self.table.read().clone();
        let owner = table.ring.get(key)?;
        if owner == self.self_url {
            return None;
        }

        debug!(key, peer = owner, "picked peer");
        let getter: Arc<dyn PeerGetter> = table.getters.get(owner)?.clone();
        Some(getter)
    }
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
