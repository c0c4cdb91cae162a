//! OData Bridge - data-source adapter with sharded response caching
//!
//! Fronts a remote OData-style API for a reporting host, caching fetched
//! payloads through a compressed, sharded caching layer.

mod api;
mod cache;
mod config;
mod error;
mod models;
mod odata;
mod tasks;

use std::net::SocketAddr;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use tasks::spawn_cleanup_task;

/// Main entry point for the adapter.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Probe the remote service with the configured credential
/// 4. Create shared state (backend, cache strategies, upstream client)
/// 5. Start background expiry sweep task
/// 6. Create Axum router with all endpoints
/// 7. Start HTTP server on configured port
/// 8. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "odata_bridge=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting OData Bridge");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: endpoint={}, default_cache_ttl={}s, max_entry_bytes={}, port={}",
        config.odata_endpoint, config.default_cache_ttl, config.max_entry_bytes, config.server_port
    );

    let cleanup_interval = config.cleanup_interval;
    let server_port = config.server_port;

    // Create application state with backend and cache strategies
    let state = AppState::from_config(config);
    info!("Cache backend initialized");

    // Probe the upstream credential; the adapter still starts on failure
    // so cached data stays reachable while the service is down.
    match state.client.validate_credentials().await {
        Ok(true) => info!("Upstream credentials validated"),
        Ok(false) => warn!("Upstream rejected the configured credentials"),
        Err(e) => warn!("Could not validate upstream credentials: {}", e),
    }

    // Start background expiry sweep task
    let cleanup_handle = spawn_cleanup_task(state.backend.clone(), cleanup_interval);
    info!("Background expiry sweep started");

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    // Abort the sweep task
    cleanup_handle.abort();
    warn!("Expiry sweep task aborted");
}
