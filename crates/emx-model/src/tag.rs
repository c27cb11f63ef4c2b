use serde::Serialize;

use crate::enums::TagKey;

/// A semantic tag definition shared across entities and attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "objectIRI", skip_serializing_if = "Option::is_none")]
    pub object_iri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation_label: Option<String>,
    #[serde(rename = "relationIRI", skip_serializing_if = "Option::is_none")]
    pub relation_iri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_system: Option<String>,
}

impl Tag {
    pub fn get(&self, key: TagKey) -> Option<&str> {
        let field = match key {
            TagKey::Identifier => &self.identifier,
            TagKey::Label => &self.label,
            TagKey::ObjectIri => &self.object_iri,
            TagKey::RelationLabel => &self.relation_label,
            TagKey::RelationIri => &self.relation_iri,
            TagKey::CodeSystem => &self.code_system,
        };
        field.as_deref()
    }

    pub fn set(&mut self, key: TagKey, value: Option<String>) {
        let field = match key {
            TagKey::Identifier => &mut self.identifier,
            TagKey::Label => &mut self.label,
            TagKey::ObjectIri => &mut self.object_iri,
            TagKey::RelationLabel => &mut self.relation_label,
            TagKey::RelationIri => &mut self.relation_iri,
            TagKey::CodeSystem => &mut self.code_system,
        };
        *field = value;
    }
}
