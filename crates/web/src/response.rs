//! Shared response helpers for page handlers.
//!
//! Page data uses a `{ "data": ... }` envelope; navigation uses 303 redirects
//! so a form POST is followed by a GET.

use axum::http::header::SET_COOKIE;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Redirect, Response};
use cookie::Cookie;
use reqwest::Url;
use safewatch_core::access::LOGIN_PATH;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Base used only to let [`Url`] encode relative redirect targets.
const LOCAL_ORIGIN: &str = "http://localhost";

/// `/login` with an optional `callbackUrl` and `error` code, query-encoded.
pub fn login_path(callback_url: Option<&str>, error: Option<&str>) -> String {
    let mut params = Vec::new();
    if let Some(callback) = callback_url {
        params.push(("callbackUrl", callback));
    }
    if let Some(error) = error {
        params.push(("error", error));
    }
    path_with_query(LOGIN_PATH, &params)
}

/// A local path with query-encoded parameters.
pub fn path_with_query(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    match Url::parse_with_params(&format!("{LOCAL_ORIGIN}{path}"), params) {
        Ok(url) => format!("{}?{}", url.path(), url.query().unwrap_or_default()),
        Err(_) => path.to_string(),
    }
}

/// 303 redirect that also sets (or clears) cookies.
pub fn redirect_with_cookies(path: &str, cookies: &[Cookie<'_>]) -> Response {
    let mut response = Redirect::to(path).into_response();
    append_cookies(&mut response, cookies);
    response
}

pub fn append_cookies(response: &mut Response, cookies: &[Cookie<'_>]) {
    for cookie in cookies {
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(cookie = cookie.name(), error = %e, "Unencodable cookie"),
        }
    }
}
