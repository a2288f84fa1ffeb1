//! Route definitions for the `/campaigns` resource, including import and
//! generation under `/campaigns/{id}/...`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{campaigns, imports};
use crate::state::AppState;

/// Routes mounted at `/campaigns`.
///
/// ```text
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// GET    /{id}/contacts             -> list_contacts
/// POST   /{id}/import/preview       -> imports::preview
/// POST   /{id}/generate             -> imports::generate_contacts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(campaigns::create))
        .route("/{id}", get(campaigns::get_by_id))
        .route("/{id}/contacts", get(campaigns::list_contacts))
        .route("/{id}/import/preview", post(imports::preview))
        .route("/{id}/generate", post(imports::generate_contacts))
}
