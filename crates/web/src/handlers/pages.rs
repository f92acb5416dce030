//! Root redirect, the unauthorized page, the health check and the 404
//! fallback.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use safewatch_client::error as codes;
use safewatch_core::access::LOGIN_PATH;
use serde::Serialize;
use serde_json::json;

use crate::middleware::session::read_session;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::Viewer;

/// GET /
///
/// Signed-in users land on their role's home page, everyone else on login.
pub async fn root(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    let now = chrono::Utc::now().timestamp();
    match read_session(&headers, &state.config.session) {
        Some(user) if user.expires_at > now => Redirect::to(user.role.home_path()),
        _ => Redirect::to(LOGIN_PATH),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnauthorizedPage {
    pub title: &'static str,
    pub message: &'static str,
    /// Where the "back" button goes.
    pub home: &'static str,
    pub viewer: Option<Viewer>,
}

/// GET /unauthorized
pub async fn unauthorized(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let user = read_session(&headers, &state.config.session);
    let page = UnauthorizedPage {
        title: "Access denied",
        message: "You do not have permission to view this page.",
        home: user.as_ref().map_or(LOGIN_PATH, |u| u.role.home_path()),
        viewer: user.as_ref().map(Viewer::from),
    };
    (StatusCode::FORBIDDEN, Json(DataResponse { data: page })).into_response()
}

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the REST backend answers.
    pub backend_healthy: bool,
}

/// GET /health -- returns service and backend health.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend_healthy = match state.backend.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Backend health check failed");
            false
        }
    };

    let status = if backend_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        backend_healthy,
    })
}

/// Fallback for unknown paths.
pub async fn not_found(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "No route");
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Page not found", "code": codes::NOT_FOUND })),
    )
        .into_response()
}
