//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["generations_running"], 0);
}

// ---------------------------------------------------------------------------
// Test: health reports generations in flight
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_counts_running_generations(pool: PgPool) {
    let state = common::test_state(pool);
    let app = common::build_test_app_with_state(state.clone());

    let _first = state.generation_guard.try_begin(1).unwrap();
    let _second = state.generation_guard.try_begin(2).unwrap();
    let json = body_json(get(app, "/health").await).await;
    assert_eq!(json["generations_running"], 2);
}

// ---------------------------------------------------------------------------
// Test: unknown route returns 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}
