use std::fmt::Display;
use std::str::FromStr;

use crate::auth::oauth::GoogleOAuthConfig;
use crate::auth::session::SessionConfig;

/// Dashboard server settings, read once at startup.
///
/// Only `SESSION_SECRET` is mandatory; everything else defaults to a local
/// development setup (dashboard on :3000, backend on :5000).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed to call the server with credentials.
    pub cors_origins: Vec<String>,
    /// Whole-request budget; slower requests answer 408.
    pub request_timeout_secs: u64,
    pub backend: BackendConfig,
    pub session: SessionConfig,
    /// `None` hides the Google button on the login page.
    pub google: Option<GoogleOAuthConfig>,
}

/// Where the REST backend lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL; `/api/v1/...` is appended per call.
    pub api_url: String,
    pub timeout_secs: u64,
    /// Per-section budget on composite pages such as the dashboard.
    pub section_timeout_ms: u64,
}

impl ServerConfig {
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    ///
    /// Backend, session and Google settings are read by their own
    /// `from_env`.
    ///
    /// # Panics
    ///
    /// Panics on unparseable values so a misconfigured server never starts.
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins: parse_origins(&env_or("CORS_ORIGINS", "http://localhost:3000".to_string())),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            backend: BackendConfig::from_env(),
            session: SessionConfig::from_env(),
            google: GoogleOAuthConfig::from_env(),
        }
    }
}

impl BackendConfig {
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `BACKEND_API_URL`      | `http://localhost:5000` |
    /// | `BACKEND_TIMEOUT_SECS` | `20`                    |
    /// | `SECTION_TIMEOUT_MS`   | `2500`                  |
    pub fn from_env() -> Self {
        Self {
            api_url: env_or("BACKEND_API_URL", "http://localhost:5000".to_string()),
            timeout_secs: env_or("BACKEND_TIMEOUT_SECS", 20),
            section_timeout_ms: env_or("SECTION_TIMEOUT_MS", 2500),
        }
    }
}

/// Parsed value of `name`, or `default` when unset.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

/// Comma-separated list, blanks dropped.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
