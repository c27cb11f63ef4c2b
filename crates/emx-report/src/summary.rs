//! Nested views of a model for the schema report.

use emx_model::{AttributeKey, EmxModel, Value, ValueExt};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRow {
    pub name: String,
    pub description: Option<String>,
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRow {
    pub name: String,
    pub description: Option<String>,
    pub package: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeRow {
    pub name: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub data_type: Option<String>,
    pub primary_key: bool,
}

/// Attributes of one entity, listed under its identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeTable {
    pub entity: String,
    pub description: Option<String>,
    pub attributes: Vec<AttributeRow>,
}

/// Packages, entities and per-entity attributes, in model order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaSummary {
    pub packages: Vec<PackageRow>,
    pub entities: Vec<EntityRow>,
    pub attribute_tables: Vec<AttributeTable>,
}

impl SchemaSummary {
    /// Entities without attributes appear in the entity list but get no
    /// attribute table.
    pub fn from_model(model: &EmxModel) -> Self {
        let packages = model
            .packages
            .iter()
            .map(|package| PackageRow {
                name: package.name.clone(),
                description: package.description.clone(),
                parent: package.parent.clone(),
            })
            .collect();

        let entities = model
            .entities
            .iter()
            .map(|entity| EntityRow {
                name: entity.name.clone(),
                description: entity.description.clone(),
                package: entity.package.clone(),
            })
            .collect();

        let attribute_tables = model
            .entities
            .iter()
            .filter_map(|entity| {
                let attributes: Vec<AttributeRow> = model
                    .attributes_of(&entity.id)
                    .map(|attribute| AttributeRow {
                        name: attribute.name.clone(),
                        label: property_text(attribute.get(AttributeKey::Label)),
                        description: property_text(attribute.get(AttributeKey::Description)),
                        data_type: attribute.data_type.map(|data_type| data_type.to_string()),
                        primary_key: attribute.is_id_attribute(),
                    })
                    .collect();
                if attributes.is_empty() {
                    return None;
                }
                Some(AttributeTable {
                    entity: entity.id.clone(),
                    description: entity.description.clone(),
                    attributes,
                })
            })
            .collect();

        Self {
            packages,
            entities,
            attribute_tables,
        }
    }
}

fn property_text(value: Option<&Value>) -> Option<String> {
    value.and_then(ValueExt::to_text)
}
