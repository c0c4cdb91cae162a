//! API Routes
//!
//! Configures the Axum router with all adapter endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    data_handler, health_handler, schema_handler, stats_handler, tables_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /tables` - List tables published by the remote service
/// - `GET /schema/:table` - Full reporting schema of one table
/// - `POST /data` - Formatted rows for requested fields, cache-backed
/// - `GET /stats` - Cache backend statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/tables", get(tables_handler))
        .route("/schema/:table", get(schema_handler))
        .route("/data", post(data_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
