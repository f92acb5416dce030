//! Route definitions for the `/dashboard` page.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET    /                        -> dashboard
/// GET    /sections/{name}         -> section (retry one section)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/sections/{name}", get(dashboard::section))
}
