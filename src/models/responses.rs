//! Response DTOs for the node's HTTP API
//!
//! Defines the structure of outgoing JSON bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::group::GroupStatsSnapshot;

/// Response body for the front-end lookup (GET /api/get)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// Group the value was read from
    pub group: String,
    /// The requested key
    pub key: String,
    /// The value, decoded as UTF-8 (lossy)
    pub value: String,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(group: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Statistics for a single group
#[derive(Debug, Clone, Serialize)]
pub struct GroupStatsResponse {
    /// Group name
    pub name: String,
    /// How reads were served
    #[serde(flatten)]
    pub group: GroupStatsSnapshot,
    /// Local cache occupancy and hit counters
    pub cache: CacheStats,
    /// Local cache hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl GroupStatsResponse {
    /// Creates a new GroupStatsResponse from group and cache statistics
    pub fn new(name: impl Into<String>, group: GroupStatsSnapshot, cache: CacheStats) -> Self {
        let hit_rate = cache.hit_rate();
        Self {
            name: name.into(),
            group,
            cache,
            hit_rate,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// This node's ring identifier
    pub node: String,
    /// One entry per registered group, sorted by name
    pub groups: Vec<GroupStatsResponse>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
