use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use safewatch_client::BackendClient;
use safewatch_web::auth::oauth::GoogleOAuth;
use safewatch_web::config::ServerConfig;
use safewatch_web::router::build_app_router;
use safewatch_web::state::AppState;

const DEFAULT_LOG_FILTER: &str = "safewatch_web=debug,safewatch_client=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        backend = %config.backend.api_url,
        google_sign_in = config.google.is_some(),
        "Configuration loaded"
    );

    let state = build_state(&config).await;
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST must be an IP address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {addr}: {e}"));
    tracing::info!(%addr, "SafeWatch dashboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Shut down cleanly");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// One `reqwest::Client` is shared by the backend client and Google sign-in.
///
/// An unreachable backend only warns: pages report it per request.
async fn build_state(config: &ServerConfig) -> AppState {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.backend.timeout_secs))
        .build()
        .expect("Failed to build HTTP client");

    let backend = BackendClient::with_client(http.clone(), &config.backend.api_url)
        .expect("BACKEND_API_URL must be a valid URL");
    if let Err(e) = backend.ping().await {
        tracing::warn!(error = %e, backend = %config.backend.api_url, "Backend not reachable at startup");
    }

    AppState {
        config: Arc::new(config.clone()),
        backend: Arc::new(backend),
        google: config
            .google
            .clone()
            .map(|google| Arc::new(GoogleOAuth::new(google, http))),
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("Interrupt received, draining connections"),
        () = terminate => tracing::info!("SIGTERM received, draining connections"),
    }
}
