//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint through the router.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use peercache::{api::create_router, AppState, GetterFn, GroupRegistry};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

/// Builds a router over a "scores" group and returns the loader call counter.
fn create_test_app() -> (Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let registry = Arc::new(GroupRegistry::new());
    registry
        .new_group(
            "scores",
            2 << 10,
            Arc::new(GetterFn(move |key: &str| {
                counter.fetch_add(1, Ordering::SeqCst);
                match key {
                    "Tom" => Ok(b"630".to_vec()),
                    "Jack" => Ok(b"589".to_vec()),
                    _ => Err(anyhow::anyhow!("{} not exist", key)),
                }
            })),
        )
        .unwrap();

    let app = create_router(
        AppState::new(registry, "http://localhost:8001"),
        "_peercache",
    );
    (app, calls)
}

async fn send(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// == Peer Endpoint Tests ==

#[tokio::test]
async fn test_peer_endpoint_returns_raw_bytes() {
    let (app, _) = create_test_app();

    let response = send(&app, "/_peercache/scores/get/Tom").await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"630");
}

#[tokio::test]
async fn test_peer_endpoint_loader_error_is_500() {
    let (app, _) = create_test_app();

    let response = send(&app, "/_peercache/scores/get/Unknown").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "Unknown not exist");
}

#[tokio::test]
async fn test_peer_endpoint_unknown_group_is_404() {
    let (app, _) = create_test_app();

    let response = send(&app, "/_peercache/missing/get/Tom").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Front-end Endpoint Tests ==

#[tokio::test]
async fn test_api_get_success_and_cache_hit() {
    let (app, calls) = create_test_app();

    for _ in 0..3 {
        let response = send(&app, "/api/get?group=scores&key=Tom").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["group"], "scores");
        assert_eq!(json["key"], "Tom");
        assert_eq!(json["value"], "630");
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_api_get_empty_key_is_400() {
    let (app, calls) = create_test_app();

    let response = send(&app, "/api/get?group=scores&key=").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_api_get_unknown_key_is_not_cached() {
    let (app, calls) = create_test_app();

    for _ in 0..2 {
        let response = send(&app, "/api/get?group=scores&key=Unknown").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// == Stats and Health Tests ==

#[tokio::test]
async fn test_stats_reflect_traffic() {
    let (app, _) = create_test_app();

    send(&app, "/api/get?group=scores&key=Tom").await;
    send(&app, "/api/get?group=scores&key=Tom").await;
    send(&app, "/api/get?group=scores&key=Jack").await;

    let response = send(&app, "/stats").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["node"], "http://localhost:8001");

    let scores = &json["groups"][0];
    assert_eq!(scores["name"], "scores");
    assert_eq!(scores["gets"], 3);
    assert_eq!(scores["cache_hits"], 1);
    assert_eq!(scores["local_loads"], 2);
    assert_eq!(scores["cache"]["entries"], 2);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app();

    let response = send(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _) = create_test_app();

    let response = send(&app, "/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
