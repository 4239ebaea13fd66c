//! API Module
//!
//! HTTP handlers and routing for a cache node.
//!
//! # Endpoints
//! - `GET /{namespace}/:group/get/:key` - Peer fetch, raw bytes
//! - `GET /api/get?group=..&key=..` - Front-end lookup, JSON
//! - `GET /stats` - Per-group statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
