//! Route definitions for sign-in and the session.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Sign-in routes. Mounted at the root; none of them require a session
/// except refresh and session.
///
/// ```text
/// GET    /login                   -> login_page
/// POST   /auth/login              -> login (form)
/// POST   /auth/logout             -> logout
/// POST   /auth/refresh            -> refresh
/// GET    /auth/session            -> session
/// GET    /auth/google             -> google_sign_in
/// GET    /auth/google/callback    -> google_callback
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/session", get(auth::session))
        .route("/auth/google", get(auth::google_sign_in))
        .route("/auth/google/callback", get(auth::google_callback))
}
