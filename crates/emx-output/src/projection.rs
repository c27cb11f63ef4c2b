//! Projection of models onto named tables.
//!
//! Headers are the union of the columns any record actually fills, in
//! vocabulary order, followed by language variants in sorted order.

use std::collections::{BTreeMap, BTreeSet};

use emx_model::{
    Attribute, AttributeKey, Dataset, Emx2Column, Emx2Model, EmxModel, Entity, EntityKey, Mapping,
    MappingExt, Package, PackageKey, Table, Tag, TagKey, Value,
};

pub const PACKAGES: &str = "packages";
pub const ENTITIES: &str = "entities";
pub const ATTRIBUTES: &str = "attributes";
pub const TAGS: &str = "tags";
pub const MOLGENIS: &str = "molgenis";

/// Tables of a converted model: packages, entities, attributes, tags when
/// any exist, and one table per dataset when `include_data` is set.
pub fn model_tables(model: &EmxModel, include_data: bool) -> Vec<Table> {
    let mut tables = Vec::new();

    let packages: Vec<Mapping> = model.packages.iter().map(package_record).collect();
    tables.push(project(PACKAGES, &packages, &keys(PackageKey::ALL)));

    let entities: Vec<Mapping> = model.entities.iter().map(entity_record).collect();
    tables.push(project(ENTITIES, &entities, &keys(EntityKey::ALL)));

    let attributes: Vec<Mapping> = model.attributes.iter().map(attribute_record).collect();
    tables.push(project(ATTRIBUTES, &attributes, &keys(AttributeKey::ALL)));

    if !model.tags.is_empty() {
        let tags: Vec<Mapping> = model.tags.iter().map(tag_record).collect();
        tables.push(project(TAGS, &tags, &keys(TagKey::ALL)));
    }

    if include_data {
        tables.extend(model.datasets.iter().map(dataset_table));
    }
    tables
}

/// Tables of a remapped model: the `molgenis` sheet plus its datasets.
pub fn emx2_tables(model: &Emx2Model, include_data: bool) -> Vec<Table> {
    let records: Vec<Mapping> = model
        .molgenis
        .iter()
        .map(|row| {
            let mut record = Mapping::new();
            record.put(Emx2Column::TableName.as_str(), row.table_name.as_str());
            for (column, value) in &row.cells {
                record.put(column.as_str(), value.clone());
            }
            record
        })
        .collect();

    let mut tables = vec![project(MOLGENIS, &records, &keys(Emx2Column::ALL))];
    if include_data {
        tables.extend(model.datasets.iter().map(dataset_table));
    }
    tables
}

fn dataset_table(dataset: &Dataset) -> Table {
    Table::from_mappings(dataset.name.clone(), &dataset.rows)
}

fn keys<K: ToString>(all: &[K]) -> Vec<String> {
    all.iter().map(ToString::to_string).collect()
}

/// Build a table whose header keeps only columns some record fills.
fn project(name: &str, records: &[Mapping], canonical: &[String]) -> Table {
    let observed: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.entries())
        .filter(|(_, value)| !value.is_null())
        .map(|(key, _)| key)
        .collect();

    let mut columns: Vec<String> = canonical
        .iter()
        .filter(|column| observed.contains(column.as_str()))
        .cloned()
        .collect();
    columns.extend(
        observed
            .iter()
            .filter(|key| !canonical.iter().any(|column| column == *key))
            .map(|key| (*key).to_string()),
    );

    let mut table = Table::new(name, columns);
    for record in records {
        table.push_mapping(record);
    }
    table
}

fn insert_text(record: &mut Mapping, key: impl ToString, value: Option<&String>) {
    if let Some(value) = value {
        record.put(key.to_string(), value.as_str());
    }
}

fn insert_i18n(record: &mut Mapping, i18n: &BTreeMap<String, Value>) {
    for (key, value) in i18n {
        record.put(key.as_str(), value.clone());
    }
}

fn package_record(package: &Package) -> Mapping {
    let mut record = Mapping::new();
    record.put(PackageKey::Name.as_str(), package.name.as_str());
    insert_text(&mut record, PackageKey::Label, package.label.as_ref());
    insert_text(&mut record, PackageKey::Description, package.description.as_ref());
    insert_text(&mut record, PackageKey::Parent, package.parent.as_ref());
    insert_text(&mut record, PackageKey::Tags, package.tags.as_ref());
    insert_i18n(&mut record, &package.i18n);
    record
}

fn entity_record(entity: &Entity) -> Mapping {
    let mut record = Mapping::new();
    record.put(EntityKey::Name.as_str(), entity.name.as_str());
    insert_text(&mut record, EntityKey::Label, entity.label.as_ref());
    insert_text(&mut record, EntityKey::Extends, entity.extends.as_ref());
    record.put(EntityKey::Package.as_str(), entity.package.as_str());
    if let Some(is_abstract) = entity.is_abstract {
        record.put(EntityKey::Abstract.as_str(), is_abstract);
    }
    insert_text(&mut record, EntityKey::Description, entity.description.as_ref());
    insert_text(&mut record, EntityKey::Backend, entity.backend.as_ref());
    insert_text(&mut record, EntityKey::Tags, entity.tags.as_ref());
    insert_i18n(&mut record, &entity.i18n);
    record
}

fn attribute_record(attribute: &Attribute) -> Mapping {
    let mut record = Mapping::new();
    record.put(AttributeKey::Entity.as_str(), attribute.entity.as_str());
    record.put(AttributeKey::Name.as_str(), attribute.name.as_str());
    if let Some(data_type) = attribute.data_type {
        record.put(AttributeKey::DataType.as_str(), data_type.as_str());
    }
    for (key, value) in &attribute.properties {
        record.put(key.as_str(), value.clone());
    }
    insert_i18n(&mut record, &attribute.i18n);
    record
}

fn tag_record(tag: &Tag) -> Mapping {
    let mut record = Mapping::new();
    for key in TagKey::ALL {
        insert_text(&mut record, key, tag.get(*key).map(ToString::to_string).as_ref());
    }
    record
}
