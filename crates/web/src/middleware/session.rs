//! Session extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use safewatch_client::ApiSession;
use safewatch_core::access::SessionStatus;
use safewatch_core::roles::Role;
use safewatch_core::types::RecordId;

use super::gate::{Gate, GateRejection, SignedIn};
use crate::auth::session::{session_token, validate_session, SessionClaims, SessionConfig};
use crate::state::AppState;

/// Signed-in user decoded from the session token.
///
/// Use this as an extractor in any handler open to every signed-in role;
/// requests without a valid session are redirected to the login page.
///
/// ```ignore
/// async fn my_handler(State(state): State<AppState>, user: SessionUser) -> AppResult<Json<()>> {
///     let stats = user.api(&state).incident_stats().await?;
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// Backend user id (from `claims.sub`).
    pub user_id: RecordId,
    pub email: String,
    pub role: Role,
    /// Session expiry (UTC Unix timestamp).
    pub expires_at: i64,
    backend_token: String,
}

impl SessionUser {
    pub fn from_claims(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            expires_at: claims.exp,
            backend_token: claims.backend_token,
        }
    }

    /// Backend client acting as this user.
    pub fn api<'a>(&'a self, state: &'a AppState) -> ApiSession<'a> {
        state.backend.session(&self.backend_token)
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            role: self.role,
            expires_at: self.expires_at,
        }
    }
}

/// Decode the request's session, if it carries a valid one.
pub fn read_session(headers: &HeaderMap, config: &SessionConfig) -> Option<SessionUser> {
    let token = session_token(headers)?;
    match validate_session(&token, config) {
        Ok(claims) => Some(SessionUser::from_claims(claims)),
        Err(e) => {
            tracing::debug!(error = %e, "Discarding invalid session token");
            None
        }
    }
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Gate(user, _) = Gate::<SignedIn>::from_request_parts(parts, state).await?;
        Ok(user)
    }
}
