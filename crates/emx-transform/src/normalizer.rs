//! Normalization of one loaded document into typed EMX records.
//!
//! The normalizer is stateless apart from the vocabulary and strictness it
//! was built with. Accumulating records across documents is the job of
//! [`Converter`](crate::Converter).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use emx_ingest::Document;
use emx_model::{
    Attribute, AttributeKey, Dataset, EmxError, Entity, EntityKey, Mapping, MappingExt, Package,
    PackageKey, Result, Tag, Value, ValueExt,
};
use emx_standards::{AttributeField, AttributeWhitelist, Vocabulary};
use tracing::debug;

use crate::defaults::AttributeDefaults;
use crate::fields::{mapping_list, optional_bool, optional_text};
use crate::options::Strictness;

/// Package-level fields of the document being processed.
///
/// Starts from the document's own keys and can be overlaid with an included
/// package via [`merge_package`](Self::merge_package).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentHeader {
    pub name: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub parent: Option<String>,
    pub tags: Option<String>,
    pub i18n: BTreeMap<String, Value>,
}

impl DocumentHeader {
    pub fn from_document(document: &Document, vocabulary: &Vocabulary) -> Result<Self> {
        let location = document.path.display().to_string();
        let mut header = Self::default();
        for (key, value) in document.root.entries() {
            let slot = match vocabulary.package_key(key) {
                Some(PackageKey::Name) => &mut header.name,
                Some(PackageKey::Label) => &mut header.label,
                Some(PackageKey::Description) => &mut header.description,
                Some(PackageKey::Parent) => &mut header.parent,
                Some(PackageKey::Tags) => &mut header.tags,
                None => {
                    if vocabulary.is_language_variant(key) {
                        header.i18n.insert(key.to_string(), value.clone());
                    }
                    continue;
                }
            };
            *slot = optional_text(value, &location, key)?;
        }
        Ok(header)
    }

    /// Overlay an included package. Every field the package defines wins.
    pub fn merge_package(&mut self, package: &Package) {
        self.name = Some(package.name.clone());
        if package.label.is_some() {
            self.label.clone_from(&package.label);
        }
        if package.description.is_some() {
            self.description.clone_from(&package.description);
        }
        if package.parent.is_some() {
            self.parent.clone_from(&package.parent);
        }
        if package.tags.is_some() {
            self.tags.clone_from(&package.tags);
        }
        for (key, value) in &package.i18n {
            self.i18n.insert(key.clone(), value.clone());
        }
    }

    pub fn into_package(self, location: &str) -> Result<Package> {
        let name = self
            .name
            .ok_or_else(|| EmxError::missing_field(location, PackageKey::Name.as_str()))?;
        Ok(Package {
            name,
            label: self.label,
            description: self.description,
            parent: self.parent,
            tags: self.tags,
            i18n: self.i18n,
        })
    }
}

/// Entities, attributes and embedded datasets extracted from one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityExtract {
    pub entities: Vec<Entity>,
    pub attributes: Vec<Attribute>,
    pub datasets: Vec<Dataset>,
}

/// Turns loaded documents into whitelisted, validated EMX records.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    vocabulary: &'static Vocabulary,
    strictness: Strictness,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Vocabulary::standard())
    }
}

impl Normalizer {
    pub fn new(vocabulary: &'static Vocabulary) -> Self {
        Self {
            vocabulary,
            strictness: Strictness::default(),
        }
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn vocabulary(&self) -> &'static Vocabulary {
        self.vocabulary
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Build the package record a document declares.
    ///
    /// With `include_meta`, `version` and `date` are folded into the
    /// description as `v<version>, <YYYY-MM-DD>`.
    pub fn process_package(&self, document: &Document, include_meta: bool) -> Result<Package> {
        let location = document.path.display().to_string();
        let header = DocumentHeader::from_document(document, self.vocabulary)?;
        let mut package = header.into_package(&location)?;
        if include_meta {
            let parts = release_info(document, &location)?;
            package.fold_release_info(&parts);
        }
        Ok(package)
    }

    /// Extract entities, attributes and datasets.
    ///
    /// `header` supplies the package name entities are filed under, which may
    /// come from an included document rather than `document` itself.
    pub fn process_entities(
        &self,
        document: &Document,
        header: &DocumentHeader,
        priority_key: Option<&str>,
    ) -> Result<EntityExtract> {
        let location = document.path.display().to_string();
        let package = header
            .name
            .as_deref()
            .ok_or_else(|| EmxError::missing_field(&location, PackageKey::Name.as_str()))?;

        let raw_entities = match document.get("entities") {
            Some(value) if !value.is_null() => mapping_list(value, &location, "entities")?,
            _ if self.strictness == Strictness::Strict => {
                return Err(EmxError::missing_field(&location, "entities"));
            }
            _ => Vec::new(),
        };

        let defaults = match document.defaults() {
            Some(raw) => AttributeDefaults::from_mapping(raw, self.vocabulary, package)?,
            None => AttributeDefaults::default(),
        };
        let whitelist = self.vocabulary.attribute_whitelist(priority_key);

        let mut extract = EntityExtract::default();
        for (index, raw) in raw_entities.into_iter().enumerate() {
            let entity = self.build_entity(raw, package, &location, index)?;
            let entity_location = format!("entity {}", entity.id);

            let raw_attributes = match raw.get("attributes") {
                Some(value) if !value.is_null() => {
                    mapping_list(value, &entity_location, "attributes")?
                }
                _ => Vec::new(),
            };
            if raw_attributes.is_empty() && self.strictness == Strictness::Strict {
                return Err(EmxError::missing_field(entity_location, "attributes"));
            }

            for raw_attribute in raw_attributes {
                let mut attribute = self.build_attribute(raw_attribute, &entity.id, &whitelist)?;
                defaults.backfill(&mut attribute);
                extract.attributes.push(attribute);
            }

            if let Some(data) = raw.get("data") {
                let rows = mapping_list(data, &entity_location, "data")?
                    .into_iter()
                    .cloned()
                    .collect();
                extract.datasets.push(Dataset::new(entity.id.clone(), rows));
            }

            extract.entities.push(entity);
        }
        Ok(extract)
    }

    /// Filter `tagDefinitions` entries to the tag whitelist.
    pub fn process_tags(&self, document: &Document) -> Result<Vec<Tag>> {
        let location = document.path.display().to_string();
        let Some(raw) = document.get("tagDefinitions") else {
            return Ok(Vec::new());
        };
        let mut tags = Vec::new();
        for entry in mapping_list(raw, &location, "tagDefinitions")? {
            let mut tag = Tag::default();
            for (key, value) in entry.entries() {
                match self.vocabulary.tag_key(key) {
                    Some(tag_key) => tag.set(tag_key, optional_text(value, &location, key)?),
                    None => debug!(document = %location, key, "dropping tag key"),
                }
            }
            tags.push(tag);
        }
        Ok(tags)
    }

    fn build_entity(
        &self,
        raw: &Mapping,
        package: &str,
        location: &str,
        index: usize,
    ) -> Result<Entity> {
        let name = match raw.get("name") {
            Some(value) => optional_text(value, location, "name")?,
            None => None,
        };
        let Some(name) = name else {
            let position = format!("entity #{} of {location}", index + 1);
            return Err(EmxError::missing_field(position, "name"));
        };

        let mut entity = Entity::new(package, name);
        let entity_location = format!("entity {}", entity.id);
        for (key, value) in raw.entries() {
            let Some(entity_key) = self.vocabulary.entity_key(key) else {
                if self.vocabulary.is_language_variant(key) {
                    entity.i18n.insert(key.to_string(), value.clone());
                } else if key != "attributes" && key != "data" {
                    debug!(entity = %entity.id, key, "dropping entity key");
                }
                continue;
            };
            let slot = match entity_key {
                EntityKey::Name => continue,
                EntityKey::Abstract => {
                    entity.is_abstract = optional_bool(value, &entity_location, key)?;
                    continue;
                }
                EntityKey::Package => {
                    // Written value only; the identity key keeps the owning document.
                    if let Some(package) = optional_text(value, &entity_location, key)? {
                        entity.package = package;
                    }
                    continue;
                }
                EntityKey::Label => &mut entity.label,
                EntityKey::Extends => &mut entity.extends,
                EntityKey::Description => &mut entity.description,
                EntityKey::Backend => &mut entity.backend,
                EntityKey::Tags => &mut entity.tags,
            };
            *slot = optional_text(value, &entity_location, key)?;
        }
        Ok(entity)
    }

    fn build_attribute(
        &self,
        raw: &Mapping,
        entity: &str,
        whitelist: &AttributeWhitelist<'_>,
    ) -> Result<Attribute> {
        let location = format!("entity {entity}");
        let mut name = None;
        let mut data_type = None;
        let mut priority = None;
        let mut attribute = Attribute::new(entity, String::new());

        for (key, value) in raw.entries() {
            match whitelist.classify(key) {
                AttributeField::Known(AttributeKey::Entity) => {
                    debug!(entity, "ignoring explicit attribute entity");
                }
                AttributeField::Known(AttributeKey::Name) => {
                    name = optional_text(value, &location, key)?;
                }
                AttributeField::Known(AttributeKey::DataType) => {
                    data_type = Some(value).filter(|value| !value.is_null());
                }
                AttributeField::Known(known) => {
                    attribute.properties.insert(known, value.clone());
                }
                AttributeField::LanguageVariant => {
                    attribute.i18n.insert(key.to_string(), value.clone());
                }
                AttributeField::Priority => priority = optional_text(value, &location, key)?,
                AttributeField::Dropped => debug!(entity, key, "dropping attribute key"),
            }
        }

        if let Some(preferred) = priority.filter(|value| value != self.vocabulary.sentinel()) {
            name = Some(preferred);
        }
        attribute.name = name.ok_or_else(|| EmxError::missing_field(&location, "name"))?;

        if let Some(value) = data_type {
            let parsed = value.as_str().and_then(|text| self.vocabulary.data_type(text));
            attribute.data_type = Some(parsed.ok_or_else(|| EmxError::InvalidDataType {
                entity: entity.to_string(),
                attribute: attribute.name.clone(),
                value: value.cell_text(),
            })?);
        }
        Ok(attribute)
    }
}

/// `v<version>` and the ISO `date`, in that order, when declared.
fn release_info(document: &Document, location: &str) -> Result<Vec<String>> {
    let mut parts = Vec::new();
    if let Some(version) = document.get("version")
        && let Some(version) = optional_text(version, location, "version")?
    {
        parts.push(format!("v{version}"));
    }
    if let Some(date) = document.get("date")
        && let Some(date) = optional_text(date, location, "date")?
    {
        let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|e| {
            EmxError::invalid_value(location, "date", format!("`{date}` is not a date: {e}"))
        })?;
        parts.push(parsed.format("%Y-%m-%d").to_string());
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use emx_ingest::parse_yaml;
    use emx_model::{DataType, ErrorKind};
    use std::path::Path;

    fn document(yaml: &str) -> Document {
        let path = Path::new("models/bird.yaml");
        Document::new(path, parse_yaml(path, yaml).unwrap())
    }

    fn header(document: &Document) -> DocumentHeader {
        DocumentHeader::from_document(document, Vocabulary::standard()).unwrap()
    }

    #[test]
    fn package_folds_version_and_date() {
        let doc = document(
            "name: bird\ndescription: Bird observations\nversion: 1.2.0\ndate: 2021-09-01\nlabel-nl: Vogels\nauthor: someone\n",
        );
        let package = Normalizer::default().process_package(&doc, true).unwrap();
        assert_eq!(package.name, "bird");
        assert_eq!(
            package.description.as_deref(),
            Some("Bird observations (v1.2.0, 2021-09-01)")
        );
        assert_eq!(package.i18n.get("label-nl"), Some(&Value::from("Vogels")));

        let plain = Normalizer::default().process_package(&doc, false).unwrap();
        assert_eq!(plain.description.as_deref(), Some("Bird observations"));
    }

    #[test]
    fn package_rejects_malformed_date() {
        let doc = document("name: bird\ndate: 01/09/2021\n");
        let err = Normalizer::default().process_package(&doc, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn package_requires_name() {
        let doc = document("label: Birds\n");
        let err = Normalizer::default().process_package(&doc, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
    }

    #[test]
    fn merge_package_overrides_header_fields() {
        let doc = document("name: bird_part\nlabel: Part\nparent: zoo\n");
        let mut header = header(&doc);
        let mut included = Package::new("bird");
        included.label = Some("Birds".to_string());
        header.merge_package(&included);

        assert_eq!(header.name.as_deref(), Some("bird"));
        assert_eq!(header.label.as_deref(), Some("Birds"));
        assert_eq!(header.parent.as_deref(), Some("zoo"));
    }

    #[test]
    fn entities_are_filed_under_the_header_package() {
        let doc = document(
            "name: bird\nentities:\n  - name: species\n    package: fauna\n    abstract: true\n    colour: blue\n    attributes:\n      - name: id\n        dataType: string\n        idAttribute: true\n        entity: elsewhere\n        unknown: dropped\n",
        );
        let extract = Normalizer::default()
            .process_entities(&doc, &header(&doc), None)
            .unwrap();

        let entity = &extract.entities[0];
        assert_eq!(entity.id, "bird_species");
        assert_eq!(entity.package, "fauna");
        assert_eq!(entity.is_abstract, Some(true));

        let attribute = &extract.attributes[0];
        assert_eq!(attribute.entity, "bird_species");
        assert_eq!(attribute.data_type, Some(DataType::String));
        assert!(attribute.is_id_attribute());
        assert_eq!(attribute.properties.len(), 1);
    }

    #[test]
    fn priority_key_replaces_name_unless_sentinel() {
        let doc = document(
            "name: bird\nentities:\n  - name: species\n    attributes:\n      - name: id\n        name-nl: sleutel\n      - name: label\n        name-nl: none\n      - name: count\n",
        );
        let extract = Normalizer::default()
            .process_entities(&doc, &header(&doc), Some("name-nl"))
            .unwrap();
        let names: Vec<&str> = extract.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["sleutel", "label", "count"]);
        assert!(extract.attributes.iter().all(|a| a.i18n.is_empty()));
    }

    #[test]
    fn attribute_without_name_is_rejected() {
        let doc = document("name: bird\nentities:\n  - name: species\n    attributes:\n      - dataType: int\n");
        let err = Normalizer::default()
            .process_entities(&doc, &header(&doc), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert!(err.to_string().contains("bird_species"));
    }

    #[test]
    fn strict_mode_requires_attributes() {
        let doc = document("name: bird\nentities:\n  - name: species\n");
        let relaxed = Normalizer::default()
            .process_entities(&doc, &header(&doc), None)
            .unwrap();
        assert_eq!(relaxed.entities.len(), 1);

        let err = Normalizer::default()
            .with_strictness(Strictness::Strict)
            .process_entities(&doc, &header(&doc), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert!(err.to_string().contains("attributes"));
    }

    #[test]
    fn embedded_data_is_keyed_by_entity_identity() {
        let doc = document(
            "name: bird\nentities:\n  - name: species\n    attributes:\n      - name: id\n    data:\n      - id: robin\n      - id: wren\n",
        );
        let extract = Normalizer::default()
            .process_entities(&doc, &header(&doc), None)
            .unwrap();
        assert_eq!(extract.datasets.len(), 1);
        assert_eq!(extract.datasets[0].name, "bird_species");
        assert_eq!(extract.datasets[0].rows.len(), 2);
    }

    #[test]
    fn tags_are_filtered_to_whitelist() {
        let doc = document(
            "name: bird\ntagDefinitions:\n  - identifier: SIO_000115\n    label: identifier\n    objectIRI: http://semanticscience.org/resource/SIO_000115\n    extra: dropped\n",
        );
        let tags = Normalizer::default().process_tags(&doc).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].identifier.as_deref(), Some("SIO_000115"));
        assert!(tags[0].object_iri.is_some());
    }
}
