//! Route definitions for the `/incidents` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::forms::UPLOAD_BODY_LIMIT;
use crate::handlers::{corrective_actions, incidents, investigations};
use crate::state::AppState;

/// Routes mounted at `/incidents`.
///
/// ```text
/// GET    /                          -> list_incidents (supervisors; others -> /incidents/my)
/// POST   /                          -> create_incident (multipart)
/// GET    /my                        -> my_incidents
/// GET    /new                       -> new_incident_form
/// GET    /{id}                      -> incident_detail
/// POST   /{id}/edit                 -> update_incident
/// POST   /{id}/status               -> change_incident_status (supervisors)
/// POST   /{id}/assign               -> assign_incident (safety team)
/// POST   /{id}/delete               -> delete_incident (admin)
/// POST   /{id}/investigation        -> start_investigation (safety team)
/// POST   /{id}/corrective-actions   -> create_action (safety team)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(incidents::list_incidents)
                .post(incidents::create_incident)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/my", get(incidents::my_incidents))
        .route("/new", get(incidents::new_incident_form))
        .route("/{id}", get(incidents::incident_detail))
        .route("/{id}/edit", post(incidents::update_incident))
        .route("/{id}/status", post(incidents::change_incident_status))
        .route("/{id}/assign", post(incidents::assign_incident))
        .route("/{id}/delete", post(incidents::delete_incident))
        .route("/{id}/investigation", post(investigations::start_investigation))
        .route("/{id}/corrective-actions", post(corrective_actions::create_action))
}
