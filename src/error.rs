//! Error types for the adapter
//!
//! Provides unified error handling using thiserror.
//!
//! Cache misses are not represented here: absence is a first-class
//! `Option::None` return from the cache layer, never an error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Adapter Error Enum ==
/// Unified error type for the adapter.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Assembled cache content failed to decode or parse
    #[error("Corrupt cached payload: {0}")]
    CorruptPayload(String),

    /// A chunk still exceeds the backend entry capacity after splitting
    #[error("Chunk of {size} bytes exceeds backend entry capacity of {limit} bytes")]
    ChunkTooLarge { size: usize, limit: usize },

    /// The backend refused a single oversized entry
    #[error("Entry of {size} bytes exceeds backend entry capacity of {limit} bytes")]
    EntryTooLarge { size: usize, limit: usize },

    /// Invalid request data from the reporting host
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The remote OData service failed or answered unusably
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    /// The service metadata document could not be interpreted
    #[error("Schema error: {0}")]
    Schema(String),

    /// Internal adapter error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
/// Errors are rendered for the host at the HTTP boundary only; everything
/// below this point passes `AdapterError` values around.
impl IntoResponse for AdapterError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AdapterError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AdapterError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AdapterError::Schema(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AdapterError::CorruptPayload(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AdapterError::ChunkTooLarge { .. } | AdapterError::EntryTooLarge { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AdapterError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the adapter.
pub type Result<T> = std::result::Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_maps_to_400() {
        let response = AdapterError::InvalidRequest("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_maps_to_502() {
        let response = AdapterError::Upstream("down".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_chunk_too_large_message_names_sizes() {
        let err = AdapterError::ChunkTooLarge {
            size: 120_000,
            limit: 100_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("120000"));
        assert!(msg.contains("100000"));
    }
}
