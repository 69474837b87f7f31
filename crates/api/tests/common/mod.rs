#![allow(dead_code)]

use std::sync::Arc;

use arcana_api::config::{LogFormat, ServerConfig};
use arcana_api::router::build_app_router;
use arcana_api::state::AppState;
use arcana_core::audit::{AuditSink, MemoryAuditSink};
use arcana_db::models::card::CreateCard;
use arcana_db::models::talk::CreateTalk;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Owned thumbnail storage prefix used by every test app.
pub const OWNED_PREFIX: &str = "https://cdn.arcana.test/";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        storage_public_url: OWNED_PREFIX.to_string(),
        database_max_connections: 5,
        log_format: LogFormat::Text,
    }
}

/// Build the full application router over `pool`, discarding audit records.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_audit(pool, Arc::new(MemoryAuditSink::new()))
}

/// Build the full application router, recording audit output into `audit`.
pub fn build_test_app_with_audit(pool: PgPool, audit: Arc<MemoryAuditSink>) -> Router {
    let config = test_config();
    let sink: Arc<dyn AuditSink> = audit;
    let state = AppState::new(pool, config.clone(), sink);
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, "POST", uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, "PUT", uri, body).await
}

async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn new_card(slug: &str, sequence_index: i32) -> CreateCard {
    CreateCard {
        slug: slug.to_string(),
        name: slug.replace('-', " "),
        arcana_type: "major".to_string(),
        suit: None,
        number: Some(sequence_index),
        sequence_index,
        image_url: format!("/cards/{slug}.webp"),
        keywords: None,
        summary: "A card used in tests".to_string(),
    }
}

pub fn new_talk(title: &str) -> CreateTalk {
    CreateTalk {
        title: title.to_string(),
        speaker_name: "Test Speaker".to_string(),
        ted_url: Some(format!(
            "https://www.ted.com/talks/{}",
            title.replace(' ', "_")
        )),
        ..Default::default()
    }
}
