//! Route definitions for the `/investigations` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::investigations;
use crate::state::AppState;

/// Routes mounted at `/investigations`. Safety team only.
///
/// Investigations are started from their incident
/// (`POST /incidents/{id}/investigation`).
///
/// ```text
/// GET    /                  -> list_investigations
/// GET    /{id}              -> investigation_detail
/// POST   /{id}              -> update_investigation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(investigations::list_investigations))
        .route(
            "/{id}",
            get(investigations::investigation_detail).post(investigations::update_investigation),
        )
}
