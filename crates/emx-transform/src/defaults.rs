//! Document-level attribute defaults.

use std::collections::BTreeMap;

use emx_model::{
    Attribute, AttributeKey, DataType, EmxError, Mapping, MappingExt, Result, Value, ValueExt,
};
use emx_standards::{AttributeField, Vocabulary};
use tracing::{debug, warn};

/// The `defaults` map of one document, parsed against the attribute whitelist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeDefaults {
    pub data_type: Option<DataType>,
    pub properties: BTreeMap<AttributeKey, Value>,
    pub i18n: BTreeMap<String, Value>,
}

impl AttributeDefaults {
    /// Parse a `defaults` mapping. `document` names the source in errors.
    pub fn from_mapping(
        defaults: &Mapping,
        vocabulary: &Vocabulary,
        document: &str,
    ) -> Result<Self> {
        let whitelist = vocabulary.attribute_whitelist(None);
        let mut parsed = Self::default();
        for (key, value) in defaults.entries() {
            match whitelist.classify(key) {
                AttributeField::Known(AttributeKey::DataType) => {
                    parsed.data_type = Some(parse_default_type(value, vocabulary, document)?);
                }
                AttributeField::Known(AttributeKey::Entity | AttributeKey::Name) => {
                    warn!(document, key, "ignoring identity key in defaults");
                }
                AttributeField::Known(known) => {
                    parsed.properties.insert(known, value.clone());
                }
                AttributeField::LanguageVariant => {
                    parsed.i18n.insert(key.to_string(), value.clone());
                }
                AttributeField::Priority | AttributeField::Dropped => {
                    warn!(document, key, "dropping unknown key in defaults");
                }
            }
        }
        Ok(parsed)
    }

    pub fn is_empty(&self) -> bool {
        self.data_type.is_none() && self.properties.is_empty() && self.i18n.is_empty()
    }

    /// Fill every field the attribute does not declare. Declared values win.
    pub fn backfill(&self, attribute: &mut Attribute) {
        if attribute.data_type.is_none() && self.data_type.is_some() {
            attribute.data_type = self.data_type;
            debug!(attribute = %attribute.name, key = "dataType", "applied default");
        }
        for (key, value) in &self.properties {
            if !attribute.properties.contains_key(key) {
                attribute.properties.insert(*key, value.clone());
                debug!(attribute = %attribute.name, key = %key, "applied default");
            }
        }
        for (key, value) in &self.i18n {
            if !attribute.i18n.contains_key(key) {
                attribute.i18n.insert(key.clone(), value.clone());
            }
        }
    }
}

fn parse_default_type(value: &Value, vocabulary: &Vocabulary, document: &str) -> Result<DataType> {
    value
        .as_str()
        .and_then(|text| vocabulary.data_type(text))
        .ok_or_else(|| EmxError::InvalidDataType {
            entity: document.to_string(),
            attribute: "defaults".to_string(),
            value: value.cell_text(),
        })
}
