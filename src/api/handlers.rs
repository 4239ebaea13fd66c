//! API Handlers
//!
//! HTTP request handlers for the peer endpoint and the front-end API.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::group::{Group, GroupRegistry};
use crate::models::{ApiGetQuery, GetResponse, GroupStatsResponse, HealthResponse, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Groups this node serves
    pub registry: Arc<GroupRegistry>,
    /// This node's ring identifier, reported by /stats
    pub node: String,
}

impl AppState {
    /// Creates a new AppState over the given registry.
    pub fn new(registry: Arc<GroupRegistry>, node: impl Into<String>) -> Self {
        Self {
            registry,
            node: node.into(),
        }
    }

    fn group(&self, name: &str) -> Result<Arc<Group>> {
        self.registry
            .get(name)
            .ok_or_else(|| CacheError::GroupNotFound(name.to_string()))
    }
}

/// Handler for GET /{namespace}/:group/get/:key
///
/// Serves a value to another node as raw bytes.
pub async fn peer_get_handler(
    State(state): State<AppState>,
    Path((group, key)): Path<(String, String)>,
) -> Result<Response> {
    debug!(group = %group, key = %key, "peer request");
    let group = state.group(&group)?;
    let view = group.get(&key).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        view.byte_slice(),
    )
        .into_response())
}

/// Handler for GET /api/get?group=..&key=..
///
/// Front-end lookup returning the value as JSON.
pub async fn api_get_handler(
    State(state): State<AppState>,
    Query(query): Query<ApiGetQuery>,
) -> Result<Json<GetResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidArgument(error_msg));
    }

    let group = state.group(&query.group)?;
    let view = group.get(&query.key).await?;

    Ok(Json(GetResponse::new(query.group, query.key, view.to_string())))
}

/// Handler for GET /stats
///
/// Returns statistics for every registered group.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let groups = state
        .registry
        .names()
        .into_iter()
        .filter_map(|name| state.registry.get(&name))
        .map(|group| GroupStatsResponse::new(group.name(), group.stats(), group.cache_stats()))
        .collect();

    Json(StatsResponse {
        node: state.node.clone(),
        groups,
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
