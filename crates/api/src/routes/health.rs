use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Campaigns currently generating contacts on this instance.
    pub generations_running: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let db_healthy = pagecraft_db::health_check(&state.pool).await.is_ok();
    Json(HealthReport {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        generations_running: state.generation_guard.running_count(),
    })
}

/// `GET /health`, served beside the delivery routes rather than under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
