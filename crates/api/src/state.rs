use std::sync::Arc;

use pagecraft_core::generation::GenerationGuard;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub pool: pagecraft_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Campaigns with a bulk generation in flight.
    pub generation_guard: GenerationGuard,
    /// Outbound client for Google Sheet exports.
    pub http: reqwest::Client,
}
