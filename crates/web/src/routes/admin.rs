//! Route definitions for the `/admin` pages.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{departments, temporary_employees as temps, users};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /users                               -> list_users
/// POST   /users                               -> create_user
/// GET    /users/{id}                          -> user_detail
/// POST   /users/{id}                          -> update_user
/// POST   /users/{id}/deactivate               -> deactivate_user
///
/// GET    /departments                         -> list_departments
/// POST   /departments                         -> create_department
/// GET    /departments/{id}                    -> department_detail
/// POST   /departments/{id}                    -> update_department
/// POST   /departments/{id}/delete             -> delete_department
///
/// GET    /temporary-employees                 -> list_temporary_employees
/// POST   /temporary-employees                 -> create_temporary_employee
/// GET    /temporary-employees/{id}            -> temporary_employee_detail
/// POST   /temporary-employees/{id}            -> update_temporary_employee
/// POST   /temporary-employees/{id}/delete     -> delete_temporary_employee
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}", get(users::user_detail).post(users::update_user))
        .route("/users/{id}/deactivate", post(users::deactivate_user))
        .route(
            "/departments",
            get(departments::list_departments).post(departments::create_department),
        )
        .route(
            "/departments/{id}",
            get(departments::department_detail).post(departments::update_department),
        )
        .route("/departments/{id}/delete", post(departments::delete_department))
        .route(
            "/temporary-employees",
            get(temps::list_temporary_employees).post(temps::create_temporary_employee),
        )
        .route(
            "/temporary-employees/{id}",
            get(temps::temporary_employee_detail).post(temps::update_temporary_employee),
        )
        .route("/temporary-employees/{id}/delete", post(temps::delete_temporary_employee))
}
