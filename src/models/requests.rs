//! Request DTOs for the adapter API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for the data operation (POST /data)
///
/// # Fields
/// - `table`: The remote table (EntitySet) to read
/// - `fields`: Field ids to return, in the order the host wants them
/// - `cache_ttl_minutes`: Optional cache TTL override in minutes
#[derive(Debug, Clone, Deserialize)]
pub struct DataRequest {
    /// The remote table name
    pub table: String,
    /// Requested field ids in response column order
    pub fields: Vec<String>,
    /// Optional cache TTL override in minutes (0..=60)
    #[serde(default)]
    pub cache_ttl_minutes: Option<u64>,
}

impl DataRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.table.is_empty() {
            return Some("Table name cannot be empty".to_string());
        }
        if self.fields.is_empty() {
            return Some("At least one field must be requested".to_string());
        }
        if self.fields.iter().any(String::is_empty) {
            return Some("Field ids cannot be empty".to_string());
        }
        None
    }
}
