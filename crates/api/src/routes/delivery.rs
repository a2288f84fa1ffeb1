use axum::routing::get;
use axum::Router;

use crate::handlers::delivery;
use crate::state::AppState;

/// Recipient-facing pages, mounted at the root.
///
/// ```text
/// GET    /p/{token}             -> builder pages
/// GET    /view/{token}          -> legacy pages
/// ```
///
/// Both resolve the token the same way, so links built for either prefix
/// keep working if a campaign switches page kind.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/p/{token}", get(delivery::personalized_page))
        .route("/view/{token}", get(delivery::personalized_page))
}
