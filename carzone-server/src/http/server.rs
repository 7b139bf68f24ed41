//! Axum server setup
//!
//! Server skeleton with:
//! - Public `/health` and `/login`, everything else behind a bearer token
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::middleware::require_bearer;
use super::routes;
use crate::auth::{AuthConfig, CredentialStore, TokenIssuer};
use crate::db::{CarStore, EngineStore, PgCarStore, PgEngineStore};
use crate::service::{CarService, EngineService};

/// Default budget for the downstream call of a single request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(100);

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8080)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,

    /// Per-request budget for service calls
    pub request_timeout: Duration,

    /// Token signing settings
    pub auth: AuthConfig,
}

impl ServerConfig {
    pub fn new(auth: AuthConfig) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_permissive: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            auth,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub cars: CarService,
    pub engines: EngineService,
    pub tokens: TokenIssuer,
    pub credentials: Arc<dyn CredentialStore>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        car_store: Arc<dyn CarStore>,
        engine_store: Arc<dyn EngineStore>,
        tokens: TokenIssuer,
        credentials: Arc<dyn CredentialStore>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            cars: CarService::new(car_store),
            engines: EngineService::new(engine_store),
            tokens,
            credentials,
            request_timeout,
        }
    }
}

/// Build the application router.
pub fn build_router(state: Arc<AppState>, cors_permissive: bool) -> Router {
    let cors = if cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        // Localhost only
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://localhost:8080"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
                HeaderValue::from_static("http://127.0.0.1:8080"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let protected = Router::new()
        .merge(routes::cars::router())
        .merge(routes::engines::router())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    Router::new()
        .merge(routes::health::router())
        .merge(routes::login::router())
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server over PostgreSQL-backed stores.
///
/// # Example
///
/// ```ignore
/// let pool = connect_with_retry(&db_config, RetryPolicy::default()).await?;
/// let credentials = Arc::new(StaticCredentials::new("admin", "admin123"));
/// run_server(pool, credentials, ServerConfig::new(AuthConfig::new(secret))).await?;
/// ```
pub async fn run_server(
    pool: PgPool,
    credentials: Arc<dyn CredentialStore>,
    config: ServerConfig,
) -> Result<(), ServerError> {
    let state = AppState::new(
        Arc::new(PgCarStore::new(pool.clone())),
        Arc::new(PgEngineStore::new(pool.clone())),
        TokenIssuer::new(config.auth.clone()),
        credentials,
        config.request_timeout,
    );
    let app = build_router(Arc::new(state), config.cors_permissive);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
