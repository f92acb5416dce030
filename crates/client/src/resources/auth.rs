//! Sign-in, token exchange and the current user.

use safewatch_core::people::User;
use serde::{Deserialize, Serialize};

use crate::client::{ApiSession, BackendClient};
use crate::error::ApiResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// A backend token together with the user it belongs to.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthGrant {
    pub token: String,
    /// Token lifetime in seconds, when the backend reports one.
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: User,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleExchange<'a> {
    id_token: &'a str,
}

impl BackendClient {
    /// `POST /auth/login` with email and password.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<AuthGrant> {
        self.post_public(&["auth", "login"], credentials).await
    }

    /// `POST /auth/google`: trade a Google id token for a backend token.
    pub async fn google_sign_in(&self, id_token: &str) -> ApiResult<AuthGrant> {
        self.post_public(&["auth", "google"], &GoogleExchange { id_token })
            .await
    }
}

impl ApiSession<'_> {
    /// `POST /auth/refresh`: a fresh token for the current one.
    pub async fn refresh(&self) -> ApiResult<AuthGrant> {
        self.post(&["auth", "refresh"], &serde_json::json!({})).await
    }

    pub async fn me(&self) -> ApiResult<User> {
        self.get(&["auth", "me"]).await
    }

    pub async fn logout(&self) -> ApiResult<()> {
        self.post_empty(&["auth", "logout"]).await
    }
}
