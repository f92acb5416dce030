pub mod admin;
pub mod auth;
pub mod corrective_actions;
pub mod dashboard;
pub mod hazards;
pub mod incidents;
pub mod investigations;
pub mod notifications;
pub mod options;
pub mod pages;
pub mod reports;
pub mod vpcs;

use axum::Router;

use crate::state::AppState;

/// Build the dashboard route tree.
///
/// Route hierarchy (access in brackets; see each router for details):
///
/// ```text
/// /                                    role home or /login
/// /unauthorized                        403 page
/// /health                              service and backend health
///
/// /login                               login page (public)
/// /auth/login                          credentials sign-in (public)
/// /auth/google, /auth/google/callback  Google sign-in (public)
/// /auth/logout                         sign out
/// /auth/refresh                        re-issue session [signed in]
/// /auth/session                        current session [signed in]
///
/// /dashboard                           composite page [signed in]
/// /dashboard/sections/{name}           one section, for retries
///
/// /incidents                           register [supervisors], report (multipart)
/// /incidents/my, /new, /{id}           [signed in]
/// /incidents/{id}/...                  edit, status, assign, delete,
///                                      investigation, corrective-actions
///
/// /hazards                             register [supervisors], report (multipart)
/// /hazards/my, /new, /{id}             [signed in]
///
/// /investigations                      list, detail, update [safety team]
///
/// /corrective-actions                  register [supervisors]
/// /corrective-actions/assigned         [signed in]
/// /corrective-actions/{id}/...         status, extension, decision, complete
///
/// /vpcs                                register [supervisors], create (multipart)
/// /vpcs/my, /new, /{id}                [signed in]
///
/// /notifications                       list, read, read-all [signed in]
/// /reports                             form, generate [supervisors]
/// /options/users, /options/departments searchable dropdowns
///
/// /admin/users                         [admin]
/// /admin/departments                   [admin]
/// /admin/temporary-employees           [admin]
/// ```
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .merge(pages::router())
        .merge(auth::router())
        .nest("/dashboard", dashboard::router())
        .nest("/incidents", incidents::router())
        .nest("/hazards", hazards::router())
        .nest("/investigations", investigations::router())
        .nest("/corrective-actions", corrective_actions::router())
        .nest("/vpcs", vpcs::router())
        .nest("/notifications", notifications::router())
        .nest("/reports", reports::router())
        .nest("/options", options::router())
        .nest("/admin", admin::router())
}
