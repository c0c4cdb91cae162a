//! Response DTOs for the adapter API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::odata::{field_kind, ConceptType, DataType, FieldKind, TableSchema};

/// One field of the reporting schema, as the host sees it.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    /// Field id, matching the remote property name
    pub id: String,
    /// Display name (the property name as-is)
    pub name: String,
    /// Dimension or metric
    pub concept_type: ConceptType,
    /// Host data type
    pub data_type: DataType,
}

impl FieldSpec {
    /// Builds the spec for one field id against a table schema.
    ///
    /// Fields the schema does not describe come back as text dimensions,
    /// mirroring how their values are formatted.
    pub fn resolve(schema: &TableSchema, field_id: &str) -> Self {
        let kind = schema
            .edm_type_of(field_id)
            .map(field_kind)
            .unwrap_or(FieldKind {
                concept: ConceptType::Dimension,
                data: DataType::Text,
            });

        Self {
            id: field_id.to_string(),
            name: field_id.to_string(),
            concept_type: kind.concept,
            data_type: kind.data,
        }
    }
}

/// Response body for the schema operation (GET /schema/:table)
#[derive(Debug, Clone, Serialize)]
pub struct SchemaResponse {
    /// All fields of the table, in declaration order
    pub schema: Vec<FieldSpec>,
}

impl SchemaResponse {
    /// Creates a SchemaResponse covering every declared property.
    pub fn from_schema(schema: &TableSchema) -> Self {
        Self {
            schema: schema
                .properties
                .iter()
                .map(|property| FieldSpec::resolve(schema, &property.name))
                .collect(),
        }
    }
}

/// One formatted data row.
#[derive(Debug, Clone, Serialize)]
pub struct RowValues {
    /// Values in requested field order
    pub values: Vec<String>,
}

/// Response body for the data operation (POST /data)
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse {
    /// The requested fields, in request order
    pub schema: Vec<FieldSpec>,
    /// Formatted rows
    pub rows: Vec<RowValues>,
}

impl DataResponse {
    /// Creates a DataResponse from resolved fields and formatted rows.
    pub fn new(schema: Vec<FieldSpec>, rows: Vec<Vec<String>>) -> Self {
        Self {
            schema,
            rows: rows.into_iter().map(|values| RowValues { values }).collect(),
        }
    }
}

/// Response body for the table listing (GET /tables)
#[derive(Debug, Clone, Serialize)]
pub struct TablesResponse {
    /// Table names published by the remote service
    pub tables: Vec<String>,
}

/// Response body for cache statistics (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of backend read hits
    pub hits: u64,
    /// Number of backend read misses
    pub misses: u64,
    /// Number of entries that expired
    pub expirations: u64,
    /// Current number of backend entries
    pub total_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a StatsResponse from backend statistics.
    pub fn from_stats(stats: &CacheStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health check (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status string
    pub status: String,
}

impl HealthResponse {
    /// Creates a healthy response.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odata::{EdmType, PropertySchema};

    fn schema() -> TableSchema {
        TableSchema {
            entity: "Submissions".to_string(),
            properties: vec![
                PropertySchema {
                    name: "Id".to_string(),
                    edm_type: EdmType::Int32,
                },
                PropertySchema {
                    name: "Name".to_string(),
                    edm_type: EdmType::String,
                },
            ],
        }
    }

    #[test]
    fn test_field_spec_resolve_known() {
        let spec = FieldSpec::resolve(&schema(), "Id");
        assert_eq!(spec.concept_type, ConceptType::Metric);
        assert_eq!(spec.data_type, DataType::Number);
    }

    #[test]
    fn test_field_spec_resolve_unknown_is_text_dimension() {
        let spec = FieldSpec::resolve(&schema(), "Mystery");
        assert_eq!(spec.concept_type, ConceptType::Dimension);
        assert_eq!(spec.data_type, DataType::Text);
    }

    #[test]
    fn test_schema_response_covers_all_properties() {
        let response = SchemaResponse::from_schema(&schema());
        assert_eq!(response.schema.len(), 2);
        assert_eq!(response.schema[0].id, "Id");
        assert_eq!(response.schema[1].id, "Name");
    }

    #[test]
    fn test_data_response_wraps_rows() {
        let response = DataResponse::new(
            vec![FieldSpec::resolve(&schema(), "Name")],
            vec![vec!["alpha".to_string()], vec!["beta".to_string()]],
        );
        assert_eq!(response.rows.len(), 2);
        assert_eq!(response.rows[0].values, vec!["alpha"]);
    }

    #[test]
    fn test_stats_response_serializes() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        let response = StatsResponse::from_stats(&stats);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["hits"], 1);
        assert_eq!(json["hit_rate"], 1.0);
    }
}
