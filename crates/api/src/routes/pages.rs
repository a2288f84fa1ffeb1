//! Route definitions for the `/pages` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// Routes mounted at `/pages`.
///
/// ```text
/// POST   /                      -> create
/// GET    /{id}                  -> get_by_id
/// GET    /by-slug/{slug}        -> get_by_slug
/// PUT    /{id}/sections         -> replace_sections
/// PATCH  /{id}/sections         -> apply_ops
/// POST   /{id}/preview          -> preview
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(pages::create))
        .route("/{id}", get(pages::get_by_id))
        .route("/by-slug/{slug}", get(pages::get_by_slug))
        .route(
            "/{id}/sections",
            put(pages::replace_sections).patch(pages::apply_ops),
        )
        .route("/{id}/preview", post(pages::preview))
}
