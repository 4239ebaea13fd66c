//! Configuration Module
//!
//! Handles loading node configuration from environment variables.

use std::env;

use crate::consistent_hash::DEFAULT_REPLICAS;

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP port this node listens on
    pub server_port: u16,
    /// This node's base URL as it appears on the ring
    pub self_url: String,
    /// Base URLs of every node in the cluster, this one included
    pub peers: Vec<String>,
    /// Path prefix of the peer endpoint
    pub namespace: String,
    /// Byte budget of the demo group's local cache
    pub cache_bytes: usize,
    /// Virtual ring positions per node
    pub replicas: usize,
    /// Name of the demo group
    pub group_name: String,
}

/// Default path prefix for peer requests
pub const DEFAULT_NAMESPACE: &str = "_peercache";

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP port (default: 8001)
    /// - `SELF_URL` - This node's URL (default: `http://localhost:{SERVER_PORT}`)
    /// - `PEERS` - Comma-separated node URLs (default: `SELF_URL` only)
    /// - `NAMESPACE` - Peer endpoint prefix (default: `_peercache`)
    /// - `CACHE_BYTES` - Local cache budget in bytes (default: 2048)
    /// - `REPLICAS` - Virtual nodes per peer (default: 50)
    /// - `GROUP_NAME` - Demo group name (default: `scores`)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let server_port = parse_var("SERVER_PORT").unwrap_or(defaults.server_port);
        let self_url = env::var("SELF_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", server_port));
        let peers = env::var("PEERS")
            .ok()
            .map(|v| parse_peers(&v))
            .filter(|peers| !peers.is_empty())
            .unwrap_or_else(|| vec![self_url.clone()]);

        Self {
            server_port,
            self_url,
            peers,
            namespace: env::var("NAMESPACE")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.namespace),
            cache_bytes: parse_var("CACHE_BYTES").unwrap_or(defaults.cache_bytes),
            replicas: parse_var("REPLICAS").unwrap_or(defaults.replicas),
            group_name: env::var("GROUP_NAME")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.group_name),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let self_url = "http://localhost:8001".to_string();
        Self {
            server_port: 8001,
            peers: vec![self_url.clone()],
            self_url,
            namespace: DEFAULT_NAMESPACE.to_string(),
            cache_bytes: 2 << 10,
            replicas: DEFAULT_REPLICAS,
            group_name: "scores".to_string(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Splits a comma-separated URL list, dropping blanks.
fn parse_peers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 8001);
        assert_eq!(config.self_url, "http://localhost:8001");
        assert_eq!(config.peers, vec!["http://localhost:8001".to_string()]);
        assert_eq!(config.namespace, "_peercache");
        assert_eq!(config.cache_bytes, 2048);
        assert_eq!(config.replicas, 50);
        assert_eq!(config.group_name, "scores");
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for var in [
            "SERVER_PORT",
            "SELF_URL",
            "PEERS",
            "NAMESPACE",
            "CACHE_BYTES",
            "REPLICAS",
            "GROUP_NAME",
        ] {
            env::remove_var(var);
        }

        let config = Config::from_env();
        assert_eq!(config.server_port, 8001);
        assert_eq!(config.self_url, "http://localhost:8001");
        assert_eq!(config.peers, vec![config.self_url.clone()]);
        assert_eq!(config.cache_bytes, 2048);
    }

    #[test]
    fn test_parse_peers() {
        let peers = parse_peers(" http://a:8001, ,http://b:8002 ,");
        assert_eq!(peers, vec!["http://a:8001", "http://b:8002"]);
        assert!(parse_peers(" , ").is_empty());
    }
}
