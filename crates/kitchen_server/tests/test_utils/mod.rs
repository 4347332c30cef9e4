#![allow(dead_code)]

//! Test utilities for HTTP-level tests.

pub mod mock_upstream;

pub use mock_upstream::{MockUpstream, Reply};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use kitchen_rate_limit::RateLimitConfig;
use kitchen_server::{AppState, ServerConfig, router};
use kitchen_upstream::{ImageModel, ModelFamily, UpstreamConfig};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const HOST: &str = "kitchen.test";

/// Upstream settings pointing at the mock, with fast backoff.
pub fn upstream_config() -> UpstreamConfig {
    UpstreamConfig::default()
        .with_base_url("https://upstream.test/models")
        .with_api_key("test-key")
        .with_text_model("text-model")
        .with_max_attempts(2)
        .with_base_delay_ms(1)
        .with_max_delay_ms(4)
        .with_image_models(vec![
            ImageModel::new(ModelFamily::Imagen, "imagen-a"),
            ImageModel::new(ModelFamily::Imagen, "imagen-b"),
            ImageModel::new(ModelFamily::Imagen, "imagen-c"),
            ImageModel::new(ModelFamily::Gemini, "gemini-image-d"),
        ])
}

pub fn test_config() -> ServerConfig {
    ServerConfig::default()
        .with_upstream(upstream_config())
        .with_rate_limit(RateLimitConfig::new(60, 1000, 1000))
}

pub fn app_with(config: ServerConfig, upstream: &MockUpstream) -> Router {
    let state = AppState::new(config, Arc::new(upstream.clone())).unwrap();
    router(state)
}

pub fn app(upstream: &MockUpstream) -> Router {
    app_with(test_config(), upstream)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::HOST, HOST)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = send(app, request).await;
    let status = response.status();
    (status, body_json(response).await)
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::HOST, HOST)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}
