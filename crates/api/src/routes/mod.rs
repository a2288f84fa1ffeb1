pub mod campaigns;
pub mod delivery;
pub mod health;
pub mod pages;
pub mod sections;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /pages                                  create
/// /pages/{id}                             get
/// /pages/by-slug/{slug}                   get by slug
/// /pages/{id}/sections                    replace (PUT), apply ops (PATCH)
/// /pages/{id}/preview                     builder preview render (POST)
///
/// /sections/types                         section type menu with defaults
///
/// /campaigns                              create
/// /campaigns/{id}                         get
/// /campaigns/{id}/contacts                contacts with view counts and URLs
/// /campaigns/{id}/import/preview          parse and map an import (POST)
/// /campaigns/{id}/generate                bulk generation (POST)
/// ```
///
/// Recipient-facing pages (`/p/{token}`, `/view/{token}`) live outside
/// this tree; see [`delivery::router`].
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/pages", pages::router())
        .nest("/sections", sections::router())
        .nest("/campaigns", campaigns::router())
}
