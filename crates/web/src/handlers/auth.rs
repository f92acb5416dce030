//! Handlers for sign-in (credentials and Google), sign-out and the session.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use safewatch_client::{ApiError, AuthGrant, Credentials};
use safewatch_core::access::post_login_destination;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::oauth::{callback_code, state_removal_cookie, OAuthError, OAUTH_STATE_COOKIE};
use crate::auth::session::{issue_session, parse_cookies, removal_cookie, session_cookie};
use crate::error::{AppError, AppResult, SESSION_EXPIRED};
use crate::middleware::session::{read_session, SessionUser};
use crate::query::{LoginPageParams, OAuthCallbackParams};
use crate::response::{append_cookies, login_path, path_with_query, redirect_with_cookies, DataResponse};
use crate::state::AppState;
use crate::views::Viewer;

/// Wrong email or password.
pub const CREDENTIALS_SIGNIN: &str = "CredentialsSignin";
/// Valid identity, but the account may not sign in.
pub const ACCESS_DENIED: &str = "AccessDenied";
/// Google sign-in could not be started.
pub const OAUTH_SIGNIN: &str = "OAuthSignin";
/// Google returned something we could not use.
pub const OAUTH_CALLBACK: &str = "OAuthCallback";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[serde(default)]
    pub callback_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPage {
    pub callback_url: Option<String>,
    pub error: Option<LoginErrorView>,
    pub providers: Vec<SignInProvider>,
}

#[derive(Debug, Serialize)]
pub struct LoginErrorView {
    pub code: String,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInProvider {
    pub id: &'static str,
    pub name: &'static str,
    pub sign_in_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub user: Viewer,
    /// Session expiry (UTC Unix timestamp).
    pub expires_at: i64,
}

/// Message shown on the login page for a sign-in error code.
pub fn login_error_message(code: &str) -> &'static str {
    match code {
        SESSION_EXPIRED => "Your session has expired. Please sign in again.",
        CREDENTIALS_SIGNIN => "Invalid email or password.",
        ACCESS_DENIED => "Your account is not allowed to sign in. Contact an administrator.",
        OAUTH_SIGNIN | OAUTH_CALLBACK => "Google sign-in failed. Please try again.",
        _ => "Sign-in failed. Please try again.",
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /login
///
/// Login page model. A visitor who already holds a live session is sent on
/// to their destination, unless the page is showing an error.
pub async fn login_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<LoginPageParams>,
) -> Response {
    if params.error.is_none() {
        if let Some(user) = read_session(&headers, &state.config.session) {
            let destination = post_login_destination(params.callback_url.as_deref(), user.role);
            return axum::response::Redirect::to(&destination).into_response();
        }
    }

    let mut providers = vec![SignInProvider {
        id: "credentials",
        name: "Email",
        sign_in_url: "/auth/login".to_string(),
    }];
    if state.google.is_some() {
        let sign_in_url = match params.callback_url.as_deref() {
            Some(callback) => path_with_query("/auth/google", &[("callbackUrl", callback)]),
            None => "/auth/google".to_string(),
        };
        providers.push(SignInProvider {
            id: "google",
            name: "Google",
            sign_in_url,
        });
    }

    let error = params.error.map(|code| LoginErrorView {
        message: login_error_message(&code),
        code,
    });

    Json(DataResponse {
        data: LoginPage {
            callback_url: params.callback_url,
            error,
            providers,
        },
    })
    .into_response()
}

/// POST /auth/login
///
/// Sign in with email and password against the backend. Success sets the
/// session cookie and redirects to the callback or the role's home page;
/// failure returns to the login page with an error code.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> AppResult<Response> {
    let callback = form.callback_url.as_deref();
    if form.validate().is_err() {
        return Ok(back_to_login(callback, CREDENTIALS_SIGNIN));
    }

    let credentials = Credentials {
        email: form.email.trim().to_string(),
        password: form.password.clone(),
    };

    match state.backend.login(&credentials).await {
        Ok(grant) => start_session(&state, grant, callback, &[]),
        Err(ApiError::AuthRequired | ApiError::AuthExpired | ApiError::Validation { .. }) => {
            tracing::debug!(email = %credentials.email, "Credential sign-in rejected");
            Ok(back_to_login(callback, CREDENTIALS_SIGNIN))
        }
        Err(ApiError::Forbidden(reason)) => {
            tracing::info!(email = %credentials.email, %reason, "Sign-in denied");
            Ok(back_to_login(callback, ACCESS_DENIED))
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /auth/logout
///
/// Clear the session cookie. The backend token is revoked on a best-effort
/// basis; sign-out never fails.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(user) = read_session(&headers, &state.config.session) {
        if let Err(e) = user.api(&state).logout().await {
            tracing::debug!(user_id = %user.user_id, error = %e, "Backend logout failed");
        }
        tracing::info!(user_id = %user.user_id, "Signed out");
    }
    redirect_with_cookies(&login_path(None, None), &[removal_cookie()])
}

/// POST /auth/refresh
///
/// Trade the backend token for a fresh one and re-issue the session.
pub async fn refresh(State(state): State<AppState>, user: SessionUser) -> AppResult<Response> {
    let grant = user.api(&state).refresh().await?;
    let (token, claims) = issue_session(&grant.user, &grant.token, grant.expires_in, &state.config.session)
        .map_err(|e| AppError::InternalError(format!("Failed to sign session: {e}")))?;
    tracing::debug!(user_id = %claims.sub, "Session refreshed");

    let cookie = session_cookie(token, &claims, &state.config.session);
    let user = SessionUser::from_claims(claims);
    let mut response = Json(DataResponse {
        data: SessionView {
            user: Viewer::from(&user),
            expires_at: user.expires_at,
        },
    })
    .into_response();
    append_cookies(&mut response, &[cookie]);
    Ok(response)
}

/// GET /auth/session
pub async fn session(user: SessionUser) -> Json<DataResponse<SessionView>> {
    Json(DataResponse {
        data: SessionView {
            user: Viewer::from(&user),
            expires_at: user.expires_at,
        },
    })
}

/// GET /auth/google
///
/// Redirect to Google with a fresh signed state cookie.
pub async fn google_sign_in(
    State(state): State<AppState>,
    Query(params): Query<LoginPageParams>,
) -> Response {
    let Some(google) = state.google.as_deref() else {
        return back_to_login(None, OAUTH_SIGNIN);
    };

    match google.begin(params.callback_url, &state.config.session) {
        Ok((url, cookie)) => redirect_with_cookies(url.as_str(), &[cookie]),
        Err(e) => {
            tracing::error!(error = %e, "Could not start Google sign-in");
            back_to_login(None, OAUTH_SIGNIN)
        }
    }
}

/// GET /auth/google/callback
///
/// Check the state, trade the code for an id token, exchange that with the
/// backend, then start the session like a credential sign-in.
pub async fn google_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<OAuthCallbackParams>,
) -> AppResult<Response> {
    let clear_state = [state_removal_cookie()];
    let fail = |code: &str| redirect_with_cookies(&login_path(None, Some(code)), &clear_state);

    let Some(google) = state.google.as_deref() else {
        return Ok(fail(OAUTH_SIGNIN));
    };
    let code = match callback_code(params.code.as_deref(), params.error.as_deref()) {
        Ok(code) => code,
        Err(e @ OAuthError::Denied(_)) => {
            tracing::info!(error = %e, "Google sign-in declined");
            return Ok(fail(ACCESS_DENIED));
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rejected Google callback");
            return Ok(fail(OAUTH_CALLBACK));
        }
    };

    let cookies = parse_cookies(&headers);
    let stored = cookies.get(OAUTH_STATE_COOKIE).map(|c| c.value());
    let oauth_state = match google.verify_state(stored, params.state.as_deref(), &state.config.session) {
        Ok(oauth_state) => oauth_state,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected Google callback");
            return Ok(fail(OAUTH_CALLBACK));
        }
    };

    let id_token = match google.exchange_code(code).await {
        Ok(id_token) => id_token,
        Err(e) => {
            tracing::warn!(error = %e, "Google code exchange failed");
            return Ok(fail(OAUTH_CALLBACK));
        }
    };

    match state.backend.google_sign_in(&id_token).await {
        Ok(grant) => start_session(&state, grant, oauth_state.callback_url.as_deref(), &clear_state),
        Err(e) if e.is_auth() || matches!(e, ApiError::Forbidden(_)) => {
            tracing::info!(code = e.code(), "Backend refused Google account");
            Ok(fail(ACCESS_DENIED))
        }
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn back_to_login(callback: Option<&str>, error: &str) -> Response {
    axum::response::Redirect::to(&login_path(callback, Some(error))).into_response()
}

/// Issue the session for a backend grant and redirect to the destination.
fn start_session(
    state: &AppState,
    grant: AuthGrant,
    callback: Option<&str>,
    extra_cookies: &[cookie::Cookie<'static>],
) -> AppResult<Response> {
    if !grant.user.is_active {
        tracing::info!(user_id = %grant.user.id, "Inactive account tried to sign in");
        return Ok(redirect_with_cookies(
            &login_path(callback, Some(ACCESS_DENIED)),
            extra_cookies,
        ));
    }

    let (token, claims) = issue_session(&grant.user, &grant.token, grant.expires_in, &state.config.session)
        .map_err(|e| AppError::InternalError(format!("Failed to sign session: {e}")))?;
    tracing::info!(user_id = %claims.sub, role = %claims.role.as_str(), "Signed in");

    let mut cookies = vec![session_cookie(token, &claims, &state.config.session)];
    cookies.extend_from_slice(extra_cookies);
    Ok(redirect_with_cookies(
        &post_login_destination(callback, claims.role),
        &cookies,
    ))
}
