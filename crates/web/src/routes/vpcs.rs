//! Route definitions for the `/vpcs` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::forms::UPLOAD_BODY_LIMIT;
use crate::handlers::vpcs;
use crate::state::AppState;

/// Routes mounted at `/vpcs`.
///
/// ```text
/// GET    /                  -> list_vpcs (supervisors; others -> /vpcs/my)
/// POST   /                  -> create_vpc (multipart)
/// GET    /my                -> my_vpcs
/// GET    /new               -> new_vpc_form
/// GET    /{id}              -> vpc_detail
/// POST   /{id}/delete       -> delete_vpc (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(vpcs::list_vpcs)
                .post(vpcs::create_vpc)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/my", get(vpcs::my_vpcs))
        .route("/new", get(vpcs::new_vpc_form))
        .route("/{id}", get(vpcs::vpc_detail))
        .route("/{id}/delete", post(vpcs::delete_vpc))
}
