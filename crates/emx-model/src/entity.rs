use std::collections::BTreeMap;

use serde::Serialize;

use crate::enums::{AttributeKey, DataType};
use crate::yaml::{Value, ValueExt};

/// Identity key an attribute uses to reference its entity.
pub fn entity_id(package: &str, entity: &str) -> String {
    format!("{package}_{entity}")
}

/// A table definition within a package.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Entity {
    /// `<package>_<entity>` identity of the owning document and entity name.
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub package: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub is_abstract: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(flatten)]
    pub i18n: BTreeMap<String, Value>,
}

impl Entity {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        let package = package.into();
        let name = name.into();
        Self {
            id: entity_id(&package, &name),
            name,
            package,
            ..Self::default()
        }
    }
}

/// A column definition within an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attribute {
    pub entity: String,
    pub name: String,
    #[serde(rename = "dataType", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    /// Remaining whitelisted fields, ordered by vocabulary order.
    #[serde(flatten)]
    pub properties: BTreeMap<AttributeKey, Value>,
    #[serde(flatten)]
    pub i18n: BTreeMap<String, Value>,
}

impl Attribute {
    pub fn new(entity: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn get(&self, key: AttributeKey) -> Option<&Value> {
        self.properties.get(&key)
    }

    pub fn with_property(mut self, key: AttributeKey, value: impl Into<Value>) -> Self {
        self.properties.insert(key, value.into());
        self
    }

    /// True when the attribute is (part of) the entity's primary key.
    pub fn is_id_attribute(&self) -> bool {
        self.get(AttributeKey::IdAttribute)
            .is_some_and(ValueExt::is_truthy)
    }
}
