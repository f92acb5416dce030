//! Google sign-in (OAuth 2.0 authorization-code flow).
//!
//! `/auth/google` stores a signed, short-lived state cookie and redirects to
//! Google. The callback checks the state, trades the code for an id token
//! and hands that to the backend, which answers with its own bearer token.

use cookie::time::Duration as CookieDuration;
use cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::session::SessionConfig;

/// Cookie holding the signed OAuth state between redirect and callback.
pub const OAUTH_STATE_COOKIE: &str = "safewatch_oauth_state";

/// How long a sign-in attempt may take, in seconds.
const STATE_TTL_SECS: i64 = 600;

const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub auth_url: String,
    pub token_url: String,
}

impl GoogleOAuthConfig {
    /// Load Google OAuth settings. Returns `None` (sign-in disabled) unless
    /// both `GOOGLE_CLIENT_ID` and `GOOGLE_CLIENT_SECRET` are set.
    ///
    /// | Env Var                | Default                                       |
    /// |------------------------|-----------------------------------------------|
    /// | `GOOGLE_REDIRECT_URL`  | `http://localhost:3000/auth/google/callback`  |
    /// | `GOOGLE_AUTH_URL`      | Google's authorization endpoint               |
    /// | `GOOGLE_TOKEN_URL`     | Google's token endpoint                       |
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("GOOGLE_CLIENT_ID").ok().filter(|v| !v.is_empty())?;
        let client_secret = std::env::var("GOOGLE_CLIENT_SECRET")
            .ok()
            .filter(|v| !v.is_empty())?;

        let var_or = |name: &str, default: &str| std::env::var(name).unwrap_or_else(|_| default.into());

        Some(Self {
            client_id,
            client_secret,
            redirect_url: var_or("GOOGLE_REDIRECT_URL", "http://localhost:3000/auth/google/callback"),
            auth_url: var_or("GOOGLE_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: var_or("GOOGLE_TOKEN_URL", DEFAULT_TOKEN_URL),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("OAuth state is missing or does not match")]
    StateMismatch,

    #[error("Provider denied sign-in: {0}")]
    Denied(String),

    #[error("Callback carried no authorization code")]
    MissingCode,

    #[error("Token exchange failed: {0}")]
    Exchange(String),

    #[error("Invalid provider URL: {0}")]
    Url(String),
}

/// Contents of the signed state cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct OAuthState {
    /// Random value echoed back by the provider.
    pub nonce: String,
    /// Where to go after sign-in, if the login page carried one.
    pub callback_url: Option<String>,
    pub exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    id_token: Option<String>,
}

/// Google OAuth client sharing the server's HTTP connection pool.
#[derive(Debug, Clone)]
pub struct GoogleOAuth {
    config: GoogleOAuthConfig,
    http: reqwest::Client,
}

impl GoogleOAuth {
    pub fn new(config: GoogleOAuthConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// Start a sign-in: the provider URL to redirect to, plus the state
    /// cookie to set.
    pub fn begin(
        &self,
        callback_url: Option<String>,
        session: &SessionConfig,
    ) -> Result<(Url, Cookie<'static>), OAuthError> {
        let state = OAuthState {
            nonce: Uuid::new_v4().to_string(),
            callback_url,
            exp: chrono::Utc::now().timestamp() + STATE_TTL_SECS,
        };

        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", "openid email profile"),
                ("state", state.nonce.as_str()),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|e| OAuthError::Url(e.to_string()))?;

        let signed = encode(
            &Header::default(),
            &state,
            &EncodingKey::from_secret(session.secret.as_bytes()),
        )
        .map_err(|e| OAuthError::Exchange(format!("Failed to sign OAuth state: {e}")))?;

        let cookie = Cookie::build((OAUTH_STATE_COOKIE, signed))
            .path("/auth/google")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(session.cookie_secure)
            .max_age(CookieDuration::seconds(STATE_TTL_SECS))
            .build();

        Ok((url, cookie))
    }

    /// Check the provider's `state` parameter against the signed cookie.
    pub fn verify_state(
        &self,
        cookie_value: Option<&str>,
        returned_state: Option<&str>,
        session: &SessionConfig,
    ) -> Result<OAuthState, OAuthError> {
        let (Some(cookie_value), Some(returned)) = (cookie_value, returned_state) else {
            return Err(OAuthError::StateMismatch);
        };
        let state = decode::<OAuthState>(
            cookie_value,
            &DecodingKey::from_secret(session.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| OAuthError::StateMismatch)?
        .claims;

        if state.nonce != returned {
            return Err(OAuthError::StateMismatch);
        }
        Ok(state)
    }

    /// Trade an authorization code for Google's id token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| OAuthError::Exchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), %body, "Google token exchange rejected");
            return Err(OAuthError::Exchange(format!("provider returned {status}")));
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| OAuthError::Exchange(e.to_string()))?;
        tokens
            .id_token
            .ok_or_else(|| OAuthError::Exchange("provider returned no id_token".into()))
    }
}

/// The authorization code from a provider callback.
///
/// Google sends `error` instead of `code` when the user declines consent.
pub fn callback_code<'a>(code: Option<&'a str>, error: Option<&str>) -> Result<&'a str, OAuthError> {
    if let Some(error) = error {
        return Err(OAuthError::Denied(error.to_string()));
    }
    code.filter(|c| !c.is_empty()).ok_or(OAuthError::MissingCode)
}

/// Cookie that clears the OAuth state.
pub fn state_removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((OAUTH_STATE_COOKIE, ""))
        .path("/auth/google")
        .build();
    cookie.make_removal();
    cookie
}
