//! Route definitions for the root, unauthorized and health pages.

use axum::routing::get;
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// Ungated pages, mounted at the root.
///
/// ```text
/// GET    /                  -> root (role home or /login)
/// GET    /unauthorized      -> unauthorized (403)
/// GET    /health            -> health_check
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::root))
        .route("/unauthorized", get(pages::unauthorized))
        .route("/health", get(pages::health_check))
}
