//! Shared query parameter types for page handlers.
//!
//! List filters live in `safewatch_core` because the same struct is both the
//! page query string and the backend query. Only page-specific parameters
//! are declared here.

use serde::Deserialize;

/// Query parameters for `GET /login`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPageParams {
    /// Page to return to after sign-in.
    pub callback_url: Option<String>,
    /// Error code from a failed sign-in or an expired session.
    pub error: Option<String>,
}

/// Query parameters Google appends to `/auth/google/callback`.
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set instead of `code` when the user declined.
    pub error: Option<String>,
}

/// `?q=` for searchable dropdowns.
#[derive(Debug, Default, Deserialize)]
pub struct OptionSearchParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}
