//! OData Bridge - data-source adapter with sharded response caching
//!
//! Fronts a remote OData-style API for a reporting host: discovers table
//! schemas, fetches rows, reshapes them into flat reporting rows, and
//! caches payloads through a compressed, sharded caching layer built over
//! a capacity-limited TTL key-value backend.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod odata;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
