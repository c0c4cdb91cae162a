//! API Module
//!
//! HTTP handlers and routing for the adapter's service surface.
//!
//! # Endpoints
//! - `GET /tables` - List tables published by the remote service
//! - `GET /schema/:table` - Full reporting schema of one table
//! - `POST /data` - Formatted rows for requested fields, cache-backed
//! - `GET /stats` - Cache backend statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
