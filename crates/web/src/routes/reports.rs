//! Route definitions for the `/reports` page.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/reports`. Supervisors only.
///
/// ```text
/// GET    /                  -> report_form
/// POST   /generate          -> generate_report (file download)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::report_form))
        .route("/generate", post(reports::generate_report))
}
