//! Signed session tokens and the cookies that carry them.
//!
//! A session is an HS256-signed JWT holding the user's identity, role and
//! the backend bearer token obtained at sign-in. It travels in an HttpOnly
//! cookie, or in an `Authorization: Bearer` header for non-browser callers.

use axum::http::HeaderMap;
use cookie::time::Duration as CookieDuration;
use cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use safewatch_core::people::User;
use safewatch_core::roles::Role;
use safewatch_core::types::RecordId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "safewatch_session";

/// Claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject: the backend user id.
    pub sub: RecordId,
    pub email: String,
    pub role: Role,
    /// Bearer token for backend calls made on the user's behalf.
    pub backend_token: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for audit.
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 secret used to sign and verify session tokens.
    pub secret: String,
    /// Session lifetime in minutes (default: 60).
    pub ttl_mins: i64,
    /// Whether cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}

/// Default session lifetime in minutes.
const DEFAULT_TTL_MINS: i64 = 60;

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default |
    /// |-------------------------|----------|---------|
    /// | `SESSION_SECRET`        | **yes**  | --      |
    /// | `SESSION_TTL_MINS`      | no       | `60`    |
    /// | `SESSION_COOKIE_SECURE` | no       | `false` |
    ///
    /// # Panics
    ///
    /// Panics if `SESSION_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("SESSION_SECRET").expect("SESSION_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "SESSION_SECRET must not be empty");

        let ttl_mins: i64 = std::env::var("SESSION_TTL_MINS")
            .unwrap_or_else(|_| DEFAULT_TTL_MINS.to_string())
            .parse()
            .expect("SESSION_TTL_MINS must be a valid i64");

        let cookie_secure: bool = std::env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("SESSION_COOKIE_SECURE must be true or false");

        Self {
            secret,
            ttl_mins,
            cookie_secure,
        }
    }
}

/// Issue a session for `user`.
///
/// The session never outlives the backend token: when the backend reports a
/// shorter lifetime than the configured TTL, that lifetime wins.
pub fn issue_session(
    user: &User,
    backend_token: &str,
    backend_expires_in: Option<i64>,
    config: &SessionConfig,
) -> Result<(String, SessionClaims), jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let mut lifetime = config.ttl_mins * 60;
    if let Some(backend_secs) = backend_expires_in.filter(|s| *s > 0) {
        lifetime = lifetime.min(backend_secs);
    }

    let claims = SessionClaims {
        sub: user.id.clone(),
        email: user.email.clone(),
        role: user.role,
        backend_token: backend_token.to_string(),
        exp: now + lifetime,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok((token, claims))
}

/// Validate and decode a session token.
///
/// Expiry is checked without leeway.
pub fn validate_session(
    token: &str,
    config: &SessionConfig,
) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// The session token from the cookie, else from a Bearer header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = parse_cookies(headers).get(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Cookie carrying a freshly issued session.
///
/// The cookie expires with the token, which may be shorter than the
/// configured TTL when the backend token is.
pub fn session_cookie(token: String, claims: &SessionClaims, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(CookieDuration::seconds((claims.exp - claims.iat).max(0)))
        .build()
}

/// Cookie that clears the session in the browser.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    cookie.make_removal();
    cookie
}

/// All cookies sent with a request. Unparseable chunks are skipped.
pub fn parse_cookies(headers: &HeaderMap) -> CookieJar {
    let mut cookies = CookieJar::new();
    for header in headers.get_all(axum::http::header::COOKIE) {
        let Ok(raw) = header.to_str() else {
            continue;
        };
        for chunk in raw.split(';').map(str::trim) {
            if let Ok(cookie) = Cookie::parse(chunk) {
                cookies.add_original(cookie.into_owned());
            }
        }
    }
    cookies
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn test_config() -> SessionConfig {
        SessionConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            ttl_mins: 60,
            cookie_secure: false,
        }
    }

    fn test_user() -> User {
        User {
            id: "u-42".into(),
            email: "officer@example.com".into(),
            role: Role::SafetyOfficer,
            is_active: true,
            employee: None,
            created_at: None,
        }
    }

    #[test]
    fn issued_session_round_trips() {
        let config = test_config();
        let (token, issued) = issue_session(&test_user(), "backend-abc", None, &config).unwrap();

        let claims = validate_session(&token, &config).unwrap();
        assert_eq!(claims, issued);
        assert_eq!(claims.role, Role::SafetyOfficer);
        assert_eq!(claims.backend_token, "backend-abc");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn backend_lifetime_caps_session() {
        let (_, claims) = issue_session(&test_user(), "t", Some(600), &test_config()).unwrap();
        assert_eq!(claims.exp - claims.iat, 600);
    }

    #[test]
    fn expired_session_fails() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "u-1".into(),
            email: "a@example.com".into(),
            role: Role::Employee,
            backend_token: "t".into(),
            exp: now - 5,
            iat: now - 3600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_session(&token, &config).is_err());
    }

    #[test]
    fn different_secret_fails() {
        let (token, _) = issue_session(&test_user(), "t", None, &test_config()).unwrap();
        let other = SessionConfig {
            secret: "another-secret".into(),
            ..test_config()
        };
        assert!(validate_session(&token, &other).is_err());
    }

    #[test]
    fn token_prefers_cookie_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("theme=dark; safewatch_session=from-cookie"));
        headers.insert("authorization", HeaderValue::from_static("Bearer from-header"));
        assert_eq!(session_token(&headers).as_deref(), Some("from-cookie"));

        headers.remove("cookie");
        assert_eq!(session_token(&headers).as_deref(), Some("from-header"));

        headers.remove("authorization");
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn cookies_are_http_only() {
        let config = test_config();
        let (token, claims) = issue_session(&test_user(), "t", None, &config).unwrap();
        let issued = session_cookie(token.clone(), &claims, &config).to_string();
        assert!(issued.starts_with(&format!("safewatch_session={token}")));
        assert!(issued.contains("HttpOnly"));
        assert!(issued.contains("Max-Age=3600"));

        let removal = removal_cookie().to_string();
        assert!(removal.starts_with("safewatch_session=;"));
        assert!(removal.contains("Max-Age=0"));
    }

    #[test]
    fn cookie_expires_with_a_shortened_session() {
        let config = test_config();
        let (token, claims) = issue_session(&test_user(), "t", Some(600), &config).unwrap();
        let issued = session_cookie(token, &claims, &config).to_string();
        assert!(issued.contains("Max-Age=600"), "{issued}");
    }
}
