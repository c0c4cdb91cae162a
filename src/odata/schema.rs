//! Schema Parsing Module
//!
//! Interprets the service `$metadata` document for one table: the
//! EntitySet carrying the requested name points at an EntityType, whose
//! Property children give the ordered column list. Namespace prefixes vary
//! between services, so elements are matched by local name.

use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use crate::error::{AdapterError, Result};
use crate::odata::types::EdmType;

// == Table Schema ==
/// Ordered property schema of one remote table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// EntitySet name the schema was resolved for
    pub entity: String,
    /// Properties in declaration order
    pub properties: Vec<PropertySchema>,
}

/// One declared property of an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    pub name: String,
    pub edm_type: EdmType,
}

impl TableSchema {
    /// EDM type of a property, if the schema declares it.
    pub fn edm_type_of(&self, name: &str) -> Option<&EdmType> {
        self.properties
            .iter()
            .find(|property| property.name == name)
            .map(|property| &property.edm_type)
    }
}

// == Parse Table Schema ==
/// Resolves `entity_name` inside a `$metadata` document.
///
/// Walks EntitySet → EntityType → Property. Lookup failures are schema
/// errors naming the entity, so the host sees which table went missing.
pub fn parse_table_schema(raw_xml: &str, entity_name: &str) -> Result<TableSchema> {
    let document = Document::parse(raw_xml)
        .map_err(|e| AdapterError::Schema(format!("unparseable service metadata: {}", e)))?;

    let entity_set = document
        .descendants()
        .find(|node| is_element(node, "EntitySet") && node.attribute("Name") == Some(entity_name))
        .ok_or_else(|| {
            AdapterError::Schema(format!(
                "table {} is not listed in the service metadata",
                entity_name
            ))
        })?;

    let type_reference = entity_set.attribute("EntityType").ok_or_else(|| {
        AdapterError::Schema(format!("table {} declares no entity type", entity_name))
    })?;
    // The reference is namespace-qualified, e.g. "Models.Submission".
    let type_name = type_reference
        .rsplit('.')
        .next()
        .unwrap_or(type_reference);

    let entity_type = document
        .descendants()
        .find(|node| is_element(node, "EntityType") && node.attribute("Name") == Some(type_name))
        .ok_or_else(|| {
            AdapterError::Schema(format!(
                "entity type {} for table {} is not defined in the service metadata",
                type_name, entity_name
            ))
        })?;

    let properties = entity_type
        .children()
        .filter(|node| is_element(node, "Property"))
        .filter_map(|node| {
            // Property elements without a Name are skipped, matching how
            // navigation stubs appear in some services.
            node.attribute("Name").map(|name| PropertySchema {
                name: name.to_string(),
                edm_type: node
                    .attribute("Type")
                    .map(EdmType::parse)
                    .unwrap_or(EdmType::Other("NoType".to_string())),
            })
        })
        .collect();

    Ok(TableSchema {
        entity: entity_name.to_string(),
        properties,
    })
}

fn is_element(node: &Node, local_name: &str) -> bool {
    node.is_element() && node.tag_name().name() == local_name
}
