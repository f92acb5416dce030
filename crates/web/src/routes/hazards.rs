//! Route definitions for the `/hazards` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::forms::UPLOAD_BODY_LIMIT;
use crate::handlers::hazards;
use crate::state::AppState;

/// Routes mounted at `/hazards`.
///
/// ```text
/// GET    /                  -> list_hazards (supervisors; others -> /hazards/my)
/// POST   /                  -> create_hazard (multipart)
/// GET    /my                -> my_hazards
/// GET    /new               -> new_hazard_form
/// GET    /{id}              -> hazard_detail
/// POST   /{id}/status       -> change_hazard_status (supervisors)
/// POST   /{id}/delete       -> delete_hazard (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(hazards::list_hazards)
                .post(hazards::create_hazard)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/my", get(hazards::my_hazards))
        .route("/new", get(hazards::new_hazard_form))
        .route("/{id}", get(hazards::hazard_detail))
        .route("/{id}/status", post(hazards::change_hazard_status))
        .route("/{id}/delete", post(hazards::delete_hazard))
}
