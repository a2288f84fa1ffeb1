//! Recipient-facing page delivery. Every response is an HTML document.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use pagecraft_core::delivery::{deliver, DeliveryOutcome};
use pagecraft_db::repositories::ContactRepo;
use pagecraft_db::stores::PgPageResolver;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /p/{token} and GET /view/{token}
// ---------------------------------------------------------------------------

pub async fn personalized_page(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Response {
    let resolver = PgPageResolver::new(state.pool.clone());
    let outcome = deliver(&resolver, &token, &state.config.public_base_url).await;

    let status = match &outcome {
        DeliveryOutcome::Rendered { contact_id, .. } => {
            let pool = state.pool.clone();
            let contact_id = *contact_id;
            tokio::spawn(async move {
                if let Err(e) = ContactRepo::record_view(&pool, contact_id).await {
                    tracing::warn!(contact_id, error = %e, "Failed to record page view");
                }
            });
            StatusCode::OK
        }
        DeliveryOutcome::NotFound => StatusCode::NOT_FOUND,
        DeliveryOutcome::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Html(outcome.into_html())).into_response()
}
