//! OData Module
//!
//! Everything that faces the remote OData service: the HTTP client, the
//! `$metadata` schema parser, and the type mapping that turns raw entity
//! rows into the flat string rows the reporting host consumes.

pub mod client;
pub mod schema;
pub mod types;

pub use client::ODataClient;
pub use schema::{parse_table_schema, PropertySchema, TableSchema};
pub use types::{field_kind, format_rows, ConceptType, DataType, EdmType, FieldKind};
