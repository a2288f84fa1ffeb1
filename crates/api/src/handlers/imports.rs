//! Handlers for contact import and bulk generation.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use pagecraft_core::contact_import::{preview_csv, sheet_export_url, MappedRow};
use pagecraft_core::error::CoreError;
use pagecraft_core::generation::{
    generate, GenerationOptions, GenerationReport, PageKind, RunTicket,
};
use pagecraft_core::types::DbId;
use pagecraft_db::stores::PgContactStore;
use serde::Deserialize;
use tokio::task::JoinHandle;

use crate::error::{AppError, AppResult};
use crate::handlers::campaigns::{campaign_page_kind, load_campaign};
use crate::response::DataResponse;
use crate::state::AppState;

/// Where the contact rows come from. Exactly one must be set.
#[derive(Debug, Default, Deserialize)]
pub struct ImportSource {
    pub csv: Option<String>,
    pub sheet_url: Option<String>,
}

async fn read_source(state: &AppState, source: ImportSource) -> AppResult<String> {
    match (source.csv, source.sheet_url) {
        (Some(csv), None) => Ok(csv),
        (None, Some(url)) => fetch_sheet(state, &url).await,
        _ => Err(AppError::BadRequest(
            "Provide either csv or sheet_url".to_string(),
        )),
    }
}

/// Download a Google Sheet through its CSV export link.
async fn fetch_sheet(state: &AppState, url: &str) -> AppResult<String> {
    let export_url = sheet_export_url(url).ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "Not a Google Sheets link".to_string(),
        ))
    })?;

    let response = state
        .http
        .get(&export_url)
        .timeout(Duration::from_secs(state.config.sheet_fetch_timeout_secs))
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| {
            tracing::warn!(error = %e, "Google Sheet fetch failed");
            AppError::BadRequest(
                "Could not download the sheet; make sure it is shared as \"anyone with the link\""
                    .to_string(),
            )
        })?;

    response.text().await.map_err(|e| {
        tracing::warn!(error = %e, "Google Sheet body unreadable");
        AppError::BadRequest("Could not read the sheet contents".to_string())
    })
}

// ---------------------------------------------------------------------------
// POST /api/v1/campaigns/{id}/import/preview
// ---------------------------------------------------------------------------

pub async fn preview(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(source): Json<ImportSource>,
) -> AppResult<impl IntoResponse> {
    load_campaign(&state, id).await?;
    let text = read_source(&state, source).await?;
    let preview = preview_csv(&text)?;
    Ok(Json(DataResponse { data: preview }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/campaigns/{id}/generate
// ---------------------------------------------------------------------------

/// Create contacts and personalized URLs for every new email in the import.
///
/// Only one generation per campaign runs at a time; a second request gets 409.
pub async fn generate_contacts(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(source): Json<ImportSource>,
) -> AppResult<impl IntoResponse> {
    load_campaign(&state, id).await?;
    let ticket = state.generation_guard.try_begin(id).ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "A generation is already running for this campaign".to_string(),
        ))
    })?;

    let text = read_source(&state, source).await?;
    let preview = preview_csv(&text)?;
    let page_kind = campaign_page_kind(&state, id).await?;

    let report = spawn_generation(&state, ticket, preview.rows, page_kind)
        .await
        .map_err(|e| AppError::InternalError(format!("Generation task failed: {e}")))??;
    Ok(Json(DataResponse { data: report }))
}

/// Run a generation on its own task so it finishes even if the request that
/// started it is dropped. The ticket is released when the task ends.
pub fn spawn_generation(
    state: &AppState,
    ticket: RunTicket,
    rows: Vec<MappedRow>,
    page_kind: PageKind,
) -> JoinHandle<Result<GenerationReport, CoreError>> {
    let store = PgContactStore::new(state.pool.clone());
    let batch_size = state.config.generation_batch_size;
    let base_url = state.config.public_base_url.clone();

    tokio::spawn(async move {
        let opts = GenerationOptions {
            batch_size,
            base_url: &base_url,
            page_kind,
        };
        generate(&store, &ticket, rows, &opts).await
    })
}
