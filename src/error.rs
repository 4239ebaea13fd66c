//! Error types for the cache node
//!
//! Provides unified error handling using thiserror.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache node.
///
/// Cloneable so a single load result can be handed to every caller that
/// was coalesced onto it.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// Caller supplied an unusable argument (empty key, empty group name)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The source-of-truth loader failed; its message is passed through verbatim
    #[error("{0}")]
    SourceLoad(Arc<anyhow::Error>),

    /// A remote peer could not serve the key
    #[error("Peer fetch failed: {0}")]
    PeerFetch(String),

    /// A group name or peer picker was registered twice
    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    /// No group with this name exists in the registry
    #[error("No such group: {0}")]
    GroupNotFound(String),
}

impl CacheError {
    /// Wraps a loader error without altering its message.
    pub fn source_load(err: anyhow::Error) -> Self {
        CacheError::SourceLoad(Arc::new(err))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CacheError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            CacheError::AlreadyRegistered(_) => StatusCode::CONFLICT,
            CacheError::SourceLoad(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::PeerFetch(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache node.
pub type Result<T> = std::result::Result<T, CacheError>;
