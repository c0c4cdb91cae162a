//! Type Mapping Module
//!
//! Maps EDM property types to the reporting host's field model and formats
//! raw OData values accordingly. Formatting is a pure function of the
//! schema, the requested field ids, and the raw rows; nothing is looked
//! up through shared state.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::odata::schema::TableSchema;

// == EDM Type ==
/// Property type as declared in the service metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdmType {
    Int32,
    Int64,
    String,
    Boolean,
    Decimal,
    Date,
    Time,
    DateTime,
    DateTimeOffset,
    /// Any type without a dedicated mapping; carries the raw declaration
    Other(String),
}

impl EdmType {
    /// Parses a metadata type declaration such as `Edm.Int32`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Edm.Int32" => EdmType::Int32,
            "Edm.Int64" => EdmType::Int64,
            "Edm.String" => EdmType::String,
            "Edm.Boolean" => EdmType::Boolean,
            "Edm.Decimal" => EdmType::Decimal,
            "Edm.Date" => EdmType::Date,
            "Edm.Time" => EdmType::Time,
            "Edm.DateTime" => EdmType::DateTime,
            "Edm.DateTimeOffset" => EdmType::DateTimeOffset,
            other => EdmType::Other(other.to_string()),
        }
    }
}

// == Field Model ==
/// Whether the reporting host treats a field as a dimension or a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptType {
    Dimension,
    Metric,
}

/// Data type of a field in the reporting host's model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Number,
    Text,
    Boolean,
    /// Host format `20170317`
    YearMonthDay,
    /// Host format `2017031720`
    YearMonthDayHour,
}

/// Concept and data type of one reporting field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldKind {
    pub concept: ConceptType,
    pub data: DataType,
}

// == Field Kind ==
/// Maps an EDM type to its reporting field kind.
///
/// Unrecognized types fall back to a text dimension rather than dropping
/// data. `Edm.Time` has no host counterpart (hours and minutes are
/// separate types there), so it stays text to avoid losing values.
pub fn field_kind(edm: &EdmType) -> FieldKind {
    match edm {
        EdmType::Int32 | EdmType::Int64 | EdmType::Decimal => FieldKind {
            concept: ConceptType::Metric,
            data: DataType::Number,
        },
        EdmType::Boolean => FieldKind {
            concept: ConceptType::Metric,
            data: DataType::Boolean,
        },
        // Service format "2017-03-17", host format "20170317"
        EdmType::Date => FieldKind {
            concept: ConceptType::Dimension,
            data: DataType::YearMonthDay,
        },
        // Service format "2017-03-17T20:00[:00Z]", host format "2017031720"
        EdmType::DateTime | EdmType::DateTimeOffset => FieldKind {
            concept: ConceptType::Dimension,
            data: DataType::YearMonthDayHour,
        },
        EdmType::String | EdmType::Time | EdmType::Other(_) => FieldKind {
            concept: ConceptType::Dimension,
            data: DataType::Text,
        },
    }
}

// == Format Value ==
/// Formats one raw property value for the reporting host.
///
/// Date-typed values are squashed from the service's ISO forms into the
/// host's digit forms; everything else passes through as text. Nulls
/// format as the empty string.
pub fn format_value(raw: &Value, data_type: DataType) -> String {
    let text = match raw {
        Value::Null => return String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    match data_type {
        DataType::YearMonthDayHour => text
            .replace(['-', 'T'], "")
            .split(':')
            .next()
            .unwrap_or_default()
            .to_string(),
        DataType::YearMonthDay => text.replace('-', ""),
        _ => text,
    }
}

// == Format Rows ==
/// Formats raw entity rows into flat string rows, one value per requested
/// field id in request order. A property missing from a row formats as the
/// empty string; a field the schema does not describe is treated as text.
pub fn format_rows(schema: &TableSchema, requested: &[String], rows: &[Value]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| {
            requested
                .iter()
                .map(|field_id| match row.get(field_id) {
                    Some(raw) => {
                        let data_type = schema
                            .edm_type_of(field_id)
                            .map(|edm| field_kind(edm).data)
                            .unwrap_or(DataType::Text);
                        format_value(raw, data_type)
                    }
                    None => String::new(),
                })
                .collect()
        })
        .collect()
}
