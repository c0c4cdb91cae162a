//! Request and Response models for the adapter API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::DataRequest;
pub use responses::{
    DataResponse, FieldSpec, HealthResponse, RowValues, SchemaResponse, StatsResponse,
    TablesResponse,
};
