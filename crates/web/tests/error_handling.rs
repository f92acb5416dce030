//! Tests for `AppError` → HTTP response mapping.
//!
//! Each variant is turned into a response directly through `IntoResponse`;
//! no server or backend is involved.

use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use safewatch_client::ApiError;
use safewatch_core::attachments::{validate_files, UploadFile, MAX_FILE_SIZE};
use safewatch_core::error::{CoreError, FieldErrors};
use safewatch_web::error::AppError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn redirect_target(err: AppError) -> (StatusCode, String, Vec<String>) {
    let response = err.into_response();
    let location = response
        .headers()
        .get(LOCATION)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let cookies = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    (response.status(), location, cookies)
}

// ---------------------------------------------------------------------------
// Test: local errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Incident",
        id: "42".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Incident with id 42 not found");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("Missing incidentData field".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "Missing incidentData field");
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("signing secret rejected".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(
        !json.to_string().contains("secret"),
        "Internal error response must not leak details"
    );
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn payload_too_large_returns_413() {
    let err = AppError::PayloadTooLarge("length limit exceeded".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(json["error"], "The submission is too large.");
}

#[tokio::test]
async fn validation_error_returns_422() {
    let err = AppError::Core(CoreError::Validation("Date range is inverted".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Date range is inverted");
}

#[tokio::test]
async fn field_errors_are_keyed_by_field() {
    let mut fields = FieldErrors::new();
    fields.add("title", "Title must be between 3 and 200 characters");
    fields.add("location", "Location is required");

    let (status, json) = error_to_response(AppError::Core(CoreError::Fields(fields))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["fields"]["title"][0], "Title must be between 3 and 200 characters");
    assert_eq!(json["fields"]["location"][0], "Location is required");
}

// ---------------------------------------------------------------------------
// Test: backend failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn network_error_is_retryable_503() {
    let err = AppError::Api(ApiError::Network("connection refused".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "NETWORK_ERROR");
    assert_eq!(json["retryable"], true);
    assert!(!json.to_string().contains("connection refused"));
}

#[tokio::test]
async fn server_error_is_502_and_not_retryable() {
    let err = AppError::Api(ApiError::Server {
        status: 500,
        message: "NullPointerException at IncidentService".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "SERVER_ERROR");
    assert_eq!(json["retryable"], false);
    assert!(!json.to_string().contains("IncidentService"));
}

#[tokio::test]
async fn unknown_backend_response_is_500() {
    let err = AppError::Api(ApiError::Unknown {
        status: Some(418),
        message: "teapot".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "UNKNOWN_ERROR");
}

#[tokio::test]
async fn backend_validation_keeps_field_messages() {
    let mut fields = FieldErrors::new();
    fields.add("email", "Email already in use");
    let err = AppError::Api(ApiError::Validation {
        message: "Validation failed".into(),
        fields,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["fields"]["email"][0], "Email already in use");
}

#[tokio::test]
async fn rejected_files_are_listed() {
    let files = vec![UploadFile::new(
        "scan.jpg",
        Some("image/jpeg".into()),
        vec![0; MAX_FILE_SIZE as usize + 1],
    )];
    let rejections = validate_files(&files).unwrap_err();

    let (status, json) = error_to_response(AppError::Api(ApiError::InvalidFiles(rejections))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "INVALID_FILES");
    assert_eq!(json["files"][0]["fileName"], "scan.jpg");
    assert!(json["error"].as_str().unwrap().starts_with("scan.jpg is too large"));
}

// ---------------------------------------------------------------------------
// Test: auth and permission failures redirect
// ---------------------------------------------------------------------------

#[tokio::test]
async fn forbidden_redirects_to_unauthorized_page() {
    let (status, location, _) = redirect_target(AppError::Api(ApiError::Forbidden("Admins only".into())));

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location, "/unauthorized");
}

#[tokio::test]
async fn expired_backend_session_clears_cookie_and_redirects() {
    let (status, location, cookies) = redirect_target(AppError::Api(ApiError::AuthExpired));

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location, "/login?error=SessionExpired");
    assert!(cookies
        .iter()
        .any(|c| c.starts_with("safewatch_session=") && c.contains("Max-Age=0")));
}

#[tokio::test]
async fn local_unauthorized_redirects_to_plain_login() {
    let (status, location, _) =
        redirect_target(AppError::Core(CoreError::Unauthorized("no session".into())));

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location, "/login");
}
