use std::sync::Arc;

use safewatch_client::BackendClient;

use crate::auth::oauth::GoogleOAuth;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (session secret, section budget, ...).
    pub config: Arc<ServerConfig>,
    /// Client for the external REST backend.
    pub backend: Arc<BackendClient>,
    /// Google sign-in, when configured.
    pub google: Option<Arc<GoogleOAuth>>,
}
