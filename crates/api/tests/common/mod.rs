#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use pagecraft_core::generation::GenerationGuard;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use pagecraft_api::config::ServerConfig;
use pagecraft_api::routes;
use pagecraft_api::state::AppState;

pub const BASE_URL: &str = "https://pages.test";

/// A test `ServerConfig` with development defaults and a small batch size.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        public_base_url: BASE_URL.to_string(),
        generation_batch_size: 2,
        sheet_fetch_timeout_secs: 5,
    }
}

pub fn test_state(pool: PgPool) -> AppState {
    AppState {
        pool,
        config: Arc::new(test_config()),
        generation_guard: GenerationGuard::new(),
        http: reqwest::Client::new(),
    }
}

/// Full application router with the same middleware stack as `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_state(test_state(pool))
}

pub fn build_test_app_with_state(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .merge(routes::delivery::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn send_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PUT, uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PATCH, uri, body).await
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a page through the API and return its id.
pub async fn create_page(app: Router, slug: &str, sections: serde_json::Value) -> i64 {
    let response = post_json(
        app,
        "/api/v1/pages",
        serde_json::json!({ "name": "Hello {{first_name}}", "slug": slug, "sections": sections }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a campaign through the API and return its id.
pub async fn create_campaign(app: Router, page_id: Option<i64>) -> i64 {
    let response = post_json(
        app,
        "/api/v1/campaigns",
        serde_json::json!({ "name": "Outreach", "page_id": page_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
