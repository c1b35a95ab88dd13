// ABOUTME: HTTP server assembly and startup
// ABOUTME: Builds shared state, applies CORS, tracing, and panic layers, and serves until shutdown

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use agentdesk_api::{create_router, AppState};
use agentdesk_config::DEFAULT_LOG_FILTER;
use agentdesk_security::encryption::KeySource;
use agentdesk_security::ApiKeyEncryption;

use crate::config::Config;
use crate::middleware::create_panic_handler;

/// Install the global tracing subscriber. `RUST_LOG` wins over the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // A subscriber may already be set when embedded in tests
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Wrap the API router with CORS, request tracing, and panic recovery
pub fn build_app(state: AppState, config: &Config) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Ok(create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(create_panic_handler()))
}

/// Open the database, build the gateway, and serve until Ctrl-C
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let pool = agentdesk_storage::init_pool(&config.database_path).await?;
    info!("Using database at {}", config.database_path.display());

    let encryption = ApiKeyEncryption::from_config(config.encryption_secret.as_deref())?;
    if encryption.source() == KeySource::Machine {
        warn!("No encryption secret configured; stored API keys are bound to this machine");
    }

    info!(
        "Execution backend: {} (ledger policy: {})",
        config.executor.base_url, config.executor.ledger_policy
    );

    let state = AppState::new(pool, Arc::new(encryption), config.executor.clone())?;
    let app = build_app(state, &config)?;

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
