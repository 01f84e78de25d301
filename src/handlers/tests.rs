//! # Tests for Handlers
//!
//! Router-level checks against an unreachable store: an in-memory SQLite pool
//! that is closed before the router sees it.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Json,
};
use sea_orm::Database;
use serde_json::Value;
use tower::ServiceExt;

use crate::config::AppConfig;
use crate::handlers::root;
use crate::server::{AppState, create_app};

async fn offline_state() -> AppState {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    // Clones share the pool, so closing one closes it for the router too
    db.clone().close().await.unwrap();

    AppState {
        db,
        config: Arc::new(AppConfig::default()),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_root_handler_returns_expected_service_info() {
    let Json(service_info) = root().await;

    assert_eq!(service_info.service, "plate-ledger");
    assert_eq!(service_info.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_healthz_reports_unreachable_database() {
    let app = create_app(offline_state().await);

    let response = app
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["database"], "unreachable");
}

#[tokio::test]
async fn test_missing_owner_is_rejected_before_touching_the_store() {
    let app = create_app(offline_state().await);

    let response = app
        .oneshot(Request::get("/firms").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/problem+json"
    );
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(body["details"]["ownerId"], "required");
}

#[tokio::test]
async fn test_inbound_trace_id_is_echoed_into_errors() {
    let app = create_app(offline_state().await);

    let response = app
        .oneshot(
            Request::get("/records?ownerId=1&start=2024-99-01&end=2024-01-31")
                .header("x-trace-id", "trace-abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers().get("x-trace-id").unwrap(), "trace-abc-123");
    let body = body_json(response).await;
    assert_eq!(body["traceId"], "trace-abc-123");
}

#[tokio::test]
async fn test_malformed_json_body_is_a_validation_error() {
    let app = create_app(offline_state().await);

    let response = app
        .oneshot(
            Request::post("/firms")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_negative_chart_window_is_rejected() {
    let app = create_app(offline_state().await);

    let response = app
        .oneshot(
            Request::get("/reports/chart?ownerId=1&days=-3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_openapi_document_lists_report_routes() {
    let app = create_app(offline_state().await);

    let response = app
        .oneshot(Request::get("/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/reports/range"].is_object());
    assert!(body["paths"]["/records/delete"].is_object());
}
