//! Route definitions for dropdown option sources.

use axum::routing::get;
use axum::Router;

use crate::handlers::options;
use crate::state::AppState;

/// Routes mounted at `/options`.
///
/// ```text
/// GET    /users?q=          -> user_options (supervisors)
/// GET    /departments?q=    -> department_options
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(options::user_options))
        .route("/departments", get(options::department_options))
}
