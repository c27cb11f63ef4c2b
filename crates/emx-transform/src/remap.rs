//! Remapping of an EMX-YAML document into the EMX2 `molgenis` layout.

use emx_ingest::Document;
use emx_model::{
    AttributeKey, Dataset, Emx2Column, Emx2Model, Emx2Row, EmxError, Mapping, MappingExt, Result,
    Value, ValueExt,
};
use emx_standards::{FALLBACK_COLUMN_TYPE, Vocabulary, attribute_column, emx2_type, entity_column};
use tracing::{debug, info, warn};

use crate::fields::{mapping_list, optional_text};
use crate::options::{DefaultsMode, RemapOptions};

/// Projects one document onto EMX2 table and column rows.
#[derive(Debug, Clone, Copy)]
pub struct Remapper {
    vocabulary: &'static Vocabulary,
    options: RemapOptions,
}

impl Default for Remapper {
    fn default() -> Self {
        Self::new(RemapOptions::default())
    }
}

/// Per-document state shared by every row.
struct RemapScope<'a> {
    schema: String,
    defaults: Option<&'a Mapping>,
    entity_names: Vec<String>,
}

impl Remapper {
    pub fn new(options: RemapOptions) -> Self {
        Self {
            vocabulary: Vocabulary::standard(),
            options,
        }
    }

    pub fn with_vocabulary(mut self, vocabulary: &'static Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn options(&self) -> &RemapOptions {
        &self.options
    }

    /// Remap every entity of the document, entity row first, then its columns.
    pub fn remap(&self, document: &Document) -> Result<Emx2Model> {
        let location = document.path.display().to_string();
        info!(document = %document.display_name(), "remapping document");

        let raw_entities = match document.get("entities") {
            Some(value) if !value.is_null() => mapping_list(value, &location, "entities")?,
            _ => return Err(EmxError::missing_field(location, "entities")),
        };

        let mut entity_names = Vec::with_capacity(raw_entities.len());
        for (index, raw) in raw_entities.iter().enumerate() {
            let name = match raw.get("name") {
                Some(value) => optional_text(value, &location, "name")?,
                None => None,
            };
            let Some(name) = name else {
                let position = format!("entity #{} of {location}", index + 1);
                return Err(EmxError::missing_field(position, "name"));
            };
            entity_names.push(name);
        }

        let scope = RemapScope {
            schema: document.schema_name(),
            defaults: document.defaults(),
            entity_names,
        };

        let mut model = Emx2Model::new();
        for (raw, name) in raw_entities.iter().zip(&scope.entity_names) {
            model.molgenis.push(self.table_row(raw, name));

            let entity_location = format!("entity {name}");
            if let Some(attributes) = raw.get("attributes") {
                for raw_attribute in mapping_list(attributes, &entity_location, "attributes")? {
                    let row = self.column_row(raw_attribute, name, &scope, &entity_location)?;
                    model.molgenis.push(row);
                }
            }

            if self.options.include_data
                && let Some(data) = raw.get("data")
            {
                let rows = mapping_list(data, &entity_location, "data")?
                    .into_iter()
                    .cloned()
                    .collect();
                upsert(&mut model.datasets, Dataset::new(name.clone(), rows));
            }
        }

        debug!(rows = model.molgenis.len(), datasets = model.datasets.len(), "remapped");
        Ok(model)
    }

    fn table_row(&self, raw: &Mapping, name: &str) -> Emx2Row {
        let mut row = Emx2Row::new(name);
        for (key, value) in raw.entries() {
            let column = self.vocabulary.entity_key(key).and_then(entity_column);
            if let Some(column) = column
                && !value.is_null()
            {
                row.set(column, value.clone());
            }
        }
        row
    }

    fn column_row(
        &self,
        raw: &Mapping,
        table: &str,
        scope: &RemapScope<'_>,
        location: &str,
    ) -> Result<Emx2Row> {
        if !raw.contains_key(AttributeKey::Name.as_str()) {
            return Err(EmxError::missing_field(location, AttributeKey::Name.as_str()));
        }

        let mut row = Emx2Row::new(table);
        for (key, value) in raw.entries() {
            let Some(attribute_key) = self.mapped_key(key) else {
                continue;
            };
            let value = match (self.options.defaults_mode, self.default_for(scope, attribute_key)) {
                (DefaultsMode::Override, Some(default)) => default,
                _ => value,
            };
            self.write_cell(&mut row, attribute_key, value, scope);
        }

        if self.options.defaults_mode == DefaultsMode::Backfill
            && let Some(defaults) = scope.defaults
        {
            for (key, value) in defaults.entries() {
                let Some(attribute_key) = self.mapped_key(key) else {
                    continue;
                };
                if attribute_key != AttributeKey::IdAttribute && !raw.contains_key(key) {
                    self.write_cell(&mut row, attribute_key, value, scope);
                }
            }
        }
        Ok(row)
    }

    /// Attribute keys that have an EMX2 column.
    fn mapped_key(&self, key: &str) -> Option<AttributeKey> {
        self.vocabulary
            .attribute_key(key)
            .filter(|attribute_key| attribute_column(*attribute_key).is_some())
    }

    fn default_for<'a>(&self, scope: &RemapScope<'a>, key: AttributeKey) -> Option<&'a Value> {
        if key == AttributeKey::IdAttribute {
            return None;
        }
        scope.defaults.and_then(|defaults| defaults.get(key.as_str()))
    }

    fn write_cell(&self, row: &mut Emx2Row, key: AttributeKey, value: &Value, scope: &RemapScope<'_>) {
        let Some(column) = attribute_column(key) else {
            return;
        };
        match key {
            AttributeKey::IdAttribute => {
                let flag = value.as_flag().unwrap_or_else(|| value.is_truthy());
                row.set(column, i64::from(flag));
            }
            AttributeKey::Nillable => {
                if !value.is_null() {
                    let nillable = value.as_flag().unwrap_or_else(|| value.is_truthy());
                    row.set(column, Value::Bool(!nillable));
                }
            }
            AttributeKey::DataType => {
                row.set(column, self.column_type(value, scope, &row.table_name));
            }
            AttributeKey::RefEntity => {
                if let Some(reference) = value.to_text() {
                    let (schema, table) = split_reference(&reference, scope);
                    if self.options.keep_model_package || schema != scope.schema {
                        row.set(Emx2Column::RefSchema, schema);
                    }
                    row.set(Emx2Column::RefTable, table);
                }
            }
            _ => row.set(column, value.clone()),
        }
    }

    fn column_type(&self, value: &Value, scope: &RemapScope<'_>, table: &str) -> &'static str {
        if let Some(data_type) = value.as_str().and_then(|text| self.vocabulary.data_type(text)) {
            return emx2_type(data_type);
        }
        let fallback = scope
            .defaults
            .and_then(|defaults| defaults.get(AttributeKey::DataType.as_str()))
            .and_then(Value::as_str)
            .and_then(|text| self.vocabulary.data_type(text))
            .map_or(FALLBACK_COLUMN_TYPE, emx2_type);
        warn!(
            table,
            value = %value.cell_text(),
            fallback,
            "unknown dataType, using fallback column type"
        );
        fallback
    }
}

/// Split a `refEntity` value into schema and table.
///
/// Names of entities declared in the same document are taken as-is, so an
/// entity called `site_visit` is not mistaken for table `visit` of schema
/// `site`. Anything else is split on its last underscore.
fn split_reference(reference: &str, scope: &RemapScope<'_>) -> (String, String) {
    if scope.entity_names.iter().any(|name| name == reference) {
        return (scope.schema.clone(), reference.to_string());
    }
    match reference.rsplit_once('_') {
        Some((schema, table)) if !schema.is_empty() && !table.is_empty() => {
            (schema.to_string(), table.to_string())
        }
        _ => (scope.schema.clone(), reference.to_string()),
    }
}

fn upsert(datasets: &mut Vec<Dataset>, dataset: Dataset) {
    match datasets.iter_mut().find(|existing| existing.name == dataset.name) {
        Some(existing) => *existing = dataset,
        None => datasets.push(dataset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emx_ingest::parse_yaml;
    use emx_model::ErrorKind;
    use std::path::Path;

    fn document(yaml: &str) -> Document {
        let path = Path::new("bird.yaml");
        Document::new(path, parse_yaml(path, yaml).unwrap())
    }

    fn scope(entities: &[&str]) -> RemapScope<'static> {
        RemapScope {
            schema: "bird".to_string(),
            defaults: None,
            entity_names: entities.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn split_reference_prefers_local_entities() {
        let scope = scope(&["site_visit"]);
        assert_eq!(
            split_reference("site_visit", &scope),
            ("bird".to_string(), "site_visit".to_string())
        );
        assert_eq!(
            split_reference("zoo_keepers", &scope),
            ("zoo".to_string(), "keepers".to_string())
        );
        assert_eq!(
            split_reference("species", &scope),
            ("bird".to_string(), "species".to_string())
        );
    }

    #[test]
    fn missing_entities_is_rejected() {
        let err = Remapper::default().remap(&document("name: bird\n")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
    }

    #[test]
    fn unknown_type_falls_back_to_default_type() {
        let doc = document(
            "name: bird\ndefaults:\n  dataType: text\nentities:\n  - name: species\n    attributes:\n      - name: notes\n        dataType: memo\n",
        );
        let model = Remapper::new(RemapOptions::new().with_defaults_mode(DefaultsMode::Backfill))
            .remap(&doc)
            .unwrap();
        assert_eq!(
            model.molgenis[1].get(Emx2Column::ColumnType),
            Some(&Value::from("text"))
        );
    }
}
