use axum::routing::get;
use axum::Router;

use crate::handlers::sections;
use crate::state::AppState;

/// Routes mounted at `/sections`.
///
/// ```text
/// GET    /types                 -> list_types
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/types", get(sections::list_types))
}
