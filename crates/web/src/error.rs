use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use safewatch_client::error as codes;
use safewatch_client::ApiError;
use safewatch_core::access::UNAUTHORIZED_PATH;
use safewatch_core::error::CoreError;
use serde_json::json;

use crate::auth::session::removal_cookie;
use crate::response::{login_path, redirect_with_cookies};

/// Login error code shown after the backend rejected the session token.
pub const SESSION_EXPIRED: &str = "SessionExpired";

/// Application-level error type for page and form handlers.
///
/// Wraps [`CoreError`] for local validation and [`ApiError`] for backend
/// failures. Implements [`IntoResponse`] to produce either a consistent JSON
/// error body or, for auth and permission failures, a redirect.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `safewatch_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failed backend call.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body went past the route's size limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::from(errors))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Core(core) => core_response(core),
            AppError::Api(api) => api_response(api),
            AppError::BadRequest(msg) => error_body(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::PayloadTooLarge(msg) => {
                tracing::debug!(reason = %msg, "Request body over limit");
                error_body(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "PAYLOAD_TOO_LARGE",
                    "The submission is too large.".to_string(),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        }
    }
}

fn core_response(err: CoreError) -> Response {
    match err {
        CoreError::NotFound { entity, id } => error_body(
            StatusCode::NOT_FOUND,
            codes::NOT_FOUND,
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => error_body(StatusCode::UNPROCESSABLE_ENTITY, codes::VALIDATION_ERROR, msg),
        CoreError::Fields(fields) => {
            let body = json!({
                "error": "Please correct the highlighted fields",
                "code": codes::VALIDATION_ERROR,
                "fields": fields,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response()
        }
        CoreError::Unauthorized(msg) => {
            tracing::debug!(reason = %msg, "Unauthenticated request");
            redirect_with_cookies(&login_path(None, None), &[removal_cookie()])
        }
        CoreError::Forbidden(msg) => {
            tracing::debug!(reason = %msg, "Forbidden request");
            Redirect::to(UNAUTHORIZED_PATH).into_response()
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

fn api_response(err: ApiError) -> Response {
    let code = err.code();
    match err {
        ApiError::Validation { message, fields } => {
            let body = json!({
                "error": message,
                "code": code,
                "fields": fields,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response()
        }
        // The backend payload is never shown; the user just signs in again.
        ApiError::AuthRequired | ApiError::AuthExpired => {
            tracing::debug!(code, "Backend rejected session token");
            redirect_with_cookies(&login_path(None, Some(SESSION_EXPIRED)), &[removal_cookie()])
        }
        ApiError::Forbidden(msg) => {
            tracing::debug!(code, reason = %msg, "Backend refused access");
            Redirect::to(UNAUTHORIZED_PATH).into_response()
        }
        ApiError::NotFound(msg) => error_body(StatusCode::NOT_FOUND, code, msg),
        ApiError::InvalidFiles(rejections) => {
            let body = json!({
                "error": rejections
                    .iter()
                    .map(|r| r.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
                "code": code,
                "files": rejections,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response()
        }
        ApiError::Network(msg) => {
            tracing::warn!(code, error = %msg, "Backend unreachable");
            retry_body(
                StatusCode::SERVICE_UNAVAILABLE,
                code,
                "The safety service is unreachable. Please try again.",
                true,
            )
        }
        ApiError::Server { status, message } => {
            tracing::error!(code, status, error = %message, "Backend server error");
            retry_body(
                StatusCode::BAD_GATEWAY,
                code,
                "The safety service failed to handle the request.",
                false,
            )
        }
        ApiError::Unknown { status, message } => {
            tracing::error!(code, ?status, error = %message, "Unexpected backend response");
            retry_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                code,
                "An unexpected error occurred.",
                false,
            )
        }
    }
}

fn error_body(status: StatusCode, code: &str, message: String) -> Response {
    let body = json!({
        "error": message,
        "code": code,
    });
    (status, axum::Json(body)).into_response()
}

fn retry_body(status: StatusCode, code: &str, message: &str, retryable: bool) -> Response {
    let body = json!({
        "error": message,
        "code": code,
        "retryable": retryable,
    });
    (status, axum::Json(body)).into_response()
}
