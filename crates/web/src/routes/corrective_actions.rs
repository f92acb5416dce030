//! Route definitions for the `/corrective-actions` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::forms::UPLOAD_BODY_LIMIT;
use crate::handlers::corrective_actions as actions;
use crate::state::AppState;

/// Routes mounted at `/corrective-actions`.
///
/// ```text
/// GET    /                              -> list_actions (supervisors; others -> /assigned)
/// GET    /assigned                      -> assigned_actions
/// GET    /{id}                          -> action_detail
/// POST   /{id}/status                   -> change_action_status
/// POST   /{id}/extension                -> request_extension
/// POST   /{id}/extension/decision       -> decide_extension (safety team)
/// POST   /{id}/complete                 -> complete_action (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(actions::list_actions))
        .route("/assigned", get(actions::assigned_actions))
        .route("/{id}", get(actions::action_detail))
        .route("/{id}/status", post(actions::change_action_status))
        .route("/{id}/extension", post(actions::request_extension))
        .route("/{id}/extension/decision", post(actions::decide_extension))
        .route(
            "/{id}/complete",
            post(actions::complete_action).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}
