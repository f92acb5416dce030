#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use safewatch_client::BackendClient;
use safewatch_core::people::User;
use safewatch_core::roles::Role;
use safewatch_web::auth::oauth::{GoogleOAuth, GoogleOAuthConfig};
use safewatch_web::auth::session::{issue_session, SessionConfig, SESSION_COOKIE};
use safewatch_web::config::{BackendConfig, ServerConfig};
use safewatch_web::router::build_app_router;
use safewatch_web::state::AppState;
use tower::ServiceExt;

pub const BACKEND_TOKEN: &str = "backend-token";

const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

/// Build a test `ServerConfig` pointing at `backend_url`.
pub fn test_config(backend_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        backend: BackendConfig {
            api_url: backend_url.to_string(),
            timeout_secs: 5,
            section_timeout_ms: 2500,
        },
        session: session_config(60),
        google: None,
    }
}

fn session_config(ttl_mins: i64) -> SessionConfig {
    SessionConfig {
        secret: TEST_SECRET.to_string(),
        ttl_mins,
        cookie_secure: false,
    }
}

/// Build the full application router with all middleware layers, talking to
/// the backend at `backend_url` (usually an `httpmock::MockServer`).
pub fn build_test_app(backend_url: &str) -> Router {
    let config = test_config(backend_url);
    let backend = BackendClient::new(backend_url, Duration::from_secs(5)).unwrap();

    let state = AppState {
        config: Arc::new(config.clone()),
        backend: Arc::new(backend),
        google: None,
    };
    build_app_router(state, &config)
}

/// Like [`build_test_app`], with Google sign-in enabled and Google's token
/// endpoint served by `provider_url`.
pub fn build_test_app_with_google(backend_url: &str, provider_url: &str) -> Router {
    let google = GoogleOAuthConfig {
        client_id: "test-client".to_string(),
        client_secret: "test-client-secret".to_string(),
        redirect_url: "http://localhost:3000/auth/google/callback".to_string(),
        auth_url: format!("{provider_url}/o/oauth2/v2/auth"),
        token_url: format!("{provider_url}/token"),
    };
    let mut config = test_config(backend_url);
    config.google = Some(google.clone());
    let backend = BackendClient::new(backend_url, Duration::from_secs(5)).unwrap();

    let state = AppState {
        config: Arc::new(config.clone()),
        backend: Arc::new(backend),
        google: Some(Arc::new(GoogleOAuth::new(google, reqwest::Client::new()))),
    };
    build_app_router(state, &config)
}

pub fn test_user(role: Role) -> User {
    User {
        id: format!("{}-1", role.as_str()),
        email: format!("{}@example.com", role.as_str()),
        role,
        is_active: true,
        employee: None,
        created_at: None,
    }
}

/// `Cookie` header value carrying a valid session for `role`.
pub fn session_cookie(role: Role) -> String {
    let (token, _) = issue_session(&test_user(role), BACKEND_TOKEN, None, &session_config(60)).unwrap();
    format!("{SESSION_COOKIE}={token}")
}

/// `Cookie` header value carrying a session that expired a minute ago.
pub fn expired_session_cookie(role: Role) -> String {
    let (token, _) = issue_session(&test_user(role), BACKEND_TOKEN, None, &session_config(-1)).unwrap();
    format!("{SESSION_COOKIE}={token}")
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_as(app: Router, uri: &str, role: Role) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(COOKIE, session_cookie(role))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json_as(app: Router, uri: &str, role: Role, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(COOKIE, session_cookie(role))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

/// URL-encoded form post; `role` adds a session cookie.
pub async fn post_form(app: Router, uri: &str, role: Option<Role>, body: &str) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(role) = role {
        builder = builder.header(COOKIE, session_cookie(role));
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

/// A backend auth grant for `user`.
pub fn grant_json(user: &User, token: &str, expires_in: i64) -> serde_json::Value {
    serde_json::json!({
        "data": {
            "token": token,
            "expiresIn": expires_in,
            "user": user,
        }
    })
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(LOCATION)
        .expect("Missing Location header")
        .to_str()
        .unwrap()
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// An incident record as the backend returns it.
pub fn incident_json(id: &str, reference: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "referenceNumber": reference,
        "type": "injury",
        "severityLevel": "critical",
        "status": "new",
        "title": "Forklift collision",
        "description": "Forklift struck a racking upright in aisle 4.",
        "location": "Warehouse 1",
        "occurredAt": "2026-10-01T08:30:00Z",
        "createdAt": "2026-10-01T09:00:00Z"
    })
}

/// One part of a hand-built multipart body.
pub enum Part<'a> {
    Text { name: &'a str, value: String },
    File { name: &'a str, file_name: &'a str, content_type: &'a str, data: Vec<u8> },
}

pub const BOUNDARY: &str = "safewatch-test-boundary";

pub fn multipart_body(parts: Vec<Part<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File { name, file_name, content_type, data } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart_as(app: Router, uri: &str, role: Role, parts: Vec<Part<'_>>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(COOKIE, session_cookie(role))
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}
