//! API Handlers
//!
//! HTTP request handlers for each adapter endpoint. Row data goes through
//! the row-distributing cache, the parsed table schema through the
//! compressed blob cache, and every corrupt cached payload is downgraded
//! to a miss. Caching is an optimization here, never a correctness
//! dependency.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{MemoryBackend, RowCache, ShardedCache};
use crate::config::Config;
use crate::error::{AdapterError, Result};
use crate::models::{
    DataRequest, DataResponse, FieldSpec, HealthResponse, SchemaResponse, StatsResponse,
    TablesResponse,
};
use crate::odata::{format_rows, parse_table_schema, ODataClient, TableSchema};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Adapter configuration
    pub config: Arc<Config>,
    /// Client for the remote OData service
    pub client: ODataClient,
    /// Shared cache backend
    pub backend: Arc<RwLock<MemoryBackend>>,
    /// Compressed blob cache strategy (schemas)
    pub payloads: ShardedCache,
    /// Row-distributing cache strategy (table data)
    pub rows: RowCache,
}

impl AppState {
    /// Creates a new AppState from configuration.
    pub fn from_config(config: Config) -> Self {
        let backend = MemoryBackend::new(config.max_entry_bytes, config.max_ttl_seconds);
        let payloads = ShardedCache::new(config.max_chunk_len);
        let rows = RowCache::new(config.max_entry_bytes, config.row_size_multiplier);
        let client = ODataClient::from_config(&config);

        Self {
            config: Arc::new(config),
            client,
            backend: Arc::new(RwLock::new(backend)),
            payloads,
            rows,
        }
    }
}

/// Handler for GET /tables
///
/// Lists the tables the remote service publishes.
pub async fn tables_handler(State(state): State<AppState>) -> Result<Json<TablesResponse>> {
    let tables = state.client.list_tables().await?;
    Ok(Json(TablesResponse { tables }))
}

/// Handler for GET /schema/:table
///
/// Returns the full reporting schema of one table.
pub async fn schema_handler(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> Result<Json<SchemaResponse>> {
    if table.is_empty() {
        return Err(AdapterError::InvalidRequest(
            "Table name cannot be empty".to_string(),
        ));
    }

    let schema = table_schema(&state, &table).await?;
    Ok(Json(SchemaResponse::from_schema(&schema)))
}

/// Handler for POST /data
///
/// Returns formatted rows for the requested fields. Rows come from the
/// row cache when live, otherwise from the remote service (repopulating
/// the cache with the resolved TTL).
pub async fn data_handler(
    State(state): State<AppState>,
    Json(req): Json<DataRequest>,
) -> Result<Json<DataResponse>> {
    // Validate request
    if let Some(error_msg) = req.validate() {
        return Err(AdapterError::InvalidRequest(error_msg));
    }

    let ttl = state.config.resolve_cache_ttl(req.cache_ttl_minutes);
    let schema = table_schema(&state, &req.table).await?;

    let raw_rows = match cached_rows(&state, &req.table).await {
        Some(rows) => {
            debug!("serving {} from row cache ({} rows)", req.table, rows.len());
            rows
        }
        None => {
            info!("row cache miss for {}, fetching upstream", req.table);
            let fetched = state.client.fetch_rows(&req.table).await?;

            let mut backend = state.backend.write().await;
            if let Err(e) = state.rows.set_rows(&mut *backend, &req.table, &fetched, ttl) {
                // Failing to cache must not fail the request.
                warn!("could not cache rows for {}: {}", req.table, e);
            }
            fetched
        }
    };

    let formatted = format_rows(&schema, &req.fields, &raw_rows);
    let fields = req
        .fields
        .iter()
        .map(|field_id| FieldSpec::resolve(&schema, field_id))
        .collect();

    Ok(Json(DataResponse::new(fields, formatted)))
}

/// Handler for GET /stats
///
/// Returns current cache backend statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let backend = state.backend.read().await;
    let stats = backend.stats();

    Json(StatsResponse::from_stats(&stats))
}

/// Handler for GET /health
///
/// Returns health status of the adapter.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

// == Cache Plumbing ==

/// Reads cached rows, treating every cache anomaly as a miss.
async fn cached_rows(state: &AppState, table: &str) -> Option<Vec<serde_json::Value>> {
    let mut backend = state.backend.write().await;
    match state.rows.get_rows(&mut *backend, table) {
        Ok(hit) => hit,
        Err(e) => {
            warn!("corrupt cached rows for {}: {}", table, e);
            None
        }
    }
}

/// Resolves the table schema, preferring the blob cache.
///
/// The parsed schema is cached under the service endpoint and table name;
/// a corrupt or missing cache entry falls back to a fresh `$metadata`
/// fetch and repopulates the cache.
async fn table_schema(state: &AppState, table: &str) -> Result<TableSchema> {
    let key_parts = [
        json!(state.config.odata_endpoint),
        json!(table),
        json!("metadata"),
    ];

    {
        let mut backend = state.backend.write().await;
        match state.payloads.get(&mut *backend, &key_parts) {
            Ok(Some(hit)) => match serde_json::from_value(hit.data) {
                Ok(schema) => {
                    debug!("serving schema for {} from cache", table);
                    return Ok(schema);
                }
                Err(e) => warn!("cached schema for {} is unusable: {}", table, e),
            },
            Ok(None) => {}
            Err(e) => warn!("corrupt cached schema for {}: {}", table, e),
        }
    }

    let metadata = state.client.fetch_metadata().await?;
    let schema = parse_table_schema(&metadata, table)?;

    let serialized = serde_json::to_value(&schema)
        .map_err(|e| AdapterError::Internal(format!("schema serialization failed: {}", e)))?;
    {
        let mut backend = state.backend.write().await;
        if let Err(e) = state.payloads.set(
            &mut *backend,
            &key_parts,
            &serialized,
            state.config.default_cache_ttl,
        ) {
            warn!("could not cache schema for {}: {}", table, e);
        }
    }

    Ok(schema)
}
