use std::fs;
use std::path::{Path, PathBuf};

use emx_ingest::MemoryLoader;
use emx_model::{AttributeKey, DataType, ErrorKind, Value};
use emx_transform::{ConvertOptions, Converter};
use proptest::prelude::*;

const BIRD: &str = r#"
name: bird
defaults:
  nillable: true
entities:
  - name: species
    attributes:
      - name: id
        dataType: string
        idAttribute: true
        nillable: false
      - name: label
        dataType: string
"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write yaml");
    path
}

#[test]
fn bird_document_converts_end_to_end() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write(dir.path(), "bird.yaml", BIRD);

    let mut converter = Converter::new();
    let model = converter.convert(&[&path]).expect("convert bird");

    assert_eq!(model.packages.len(), 1);
    assert_eq!(model.packages[0].name, "bird");
    assert_eq!(model.entities.len(), 1);
    assert_eq!(model.entities[0].id, "bird_species");
    assert_eq!(model.entities[0].name, "species");
    assert_eq!(model.attributes.len(), 2);

    let id = &model.attributes[0];
    let label = &model.attributes[1];
    assert!(model.attributes.iter().all(|a| a.entity == "bird_species"));
    assert_eq!(id.get(AttributeKey::Nillable), Some(&Value::Bool(false)));
    assert_eq!(label.get(AttributeKey::Nillable), Some(&Value::Bool(true)));
    assert_eq!(label.data_type, Some(DataType::String));
}

#[test]
fn shared_include_contributes_one_package() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(
        dir.path(),
        "base.yaml",
        "name: bird\nlabel: Birds\nversion: 2\ndate: 2022-03-14\n",
    );
    let species = write(
        dir.path(),
        "species.yaml",
        "include: base.yaml\nentities:\n  - name: species\n    attributes:\n      - name: id\n",
    );
    let sites = write(
        dir.path(),
        "sites.yaml",
        "include: base.yaml\nentities:\n  - name: sites\n    attributes:\n      - name: code\n",
    );

    let mut converter = Converter::new();
    let model = converter.convert(&[&species, &sites]).expect("convert");

    assert_eq!(model.packages.len(), 1);
    assert_eq!(model.packages[0].description.as_deref(), Some("v2, 2022-03-14"));
    let ids: Vec<&str> = model.entities.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["bird_species", "bird_sites"]);
    assert_eq!(model.attributes[1].entity, "bird_sites");
}

#[test]
fn priority_key_applies_across_documents() {
    let mut loader = MemoryLoader::new();
    loader
        .insert_yaml(
            "a.yaml",
            "name: a\nentities:\n  - name: t\n    attributes:\n      - name: id\n        name-alt: key\n",
        )
        .unwrap();
    loader
        .insert_yaml(
            "b.yaml",
            "name: b\nentities:\n  - name: t\n    attributes:\n      - name: code\n        name-alt: none\n      - name: label\n        name-alt: title\n",
        )
        .unwrap();

    let mut converter = Converter::with_loader(loader)
        .with_options(ConvertOptions::new().with_priority_name_key("name-alt"));
    let model = converter.convert(&["a.yaml", "b.yaml"]).unwrap();

    let names: Vec<(&str, &str)> = model
        .attributes
        .iter()
        .map(|a| (a.entity.as_str(), a.name.as_str()))
        .collect();
    assert_eq!(names, vec![("a_t", "key"), ("b_t", "code"), ("b_t", "title")]);
}

#[test]
fn later_datasets_replace_earlier_ones() {
    let mut loader = MemoryLoader::new();
    loader
        .insert_yaml(
            "a.yaml",
            "name: bird\nentities:\n  - name: species\n    data:\n      - id: robin\n",
        )
        .unwrap();
    loader
        .insert_yaml(
            "b.yaml",
            "include: a.yaml\nentities:\n  - name: species\n    data:\n      - id: wren\n      - id: owl\n",
        )
        .unwrap();

    let mut converter = Converter::with_loader(loader);
    let model = converter.convert(&["a.yaml", "b.yaml"]).unwrap();
    assert_eq!(model.datasets.len(), 1);
    assert_eq!(model.datasets[0].rows.len(), 2);
}

#[test]
fn strict_missing_attributes_leaves_model_empty() {
    let mut loader = MemoryLoader::new();
    loader
        .insert_yaml("ok.yaml", "name: ok\nentities:\n  - name: t\n    attributes:\n      - name: id\n")
        .unwrap();
    loader
        .insert_yaml("bad.yaml", "name: bad\nentities:\n  - name: empty\n")
        .unwrap();

    let mut converter = Converter::with_loader(loader).with_options(ConvertOptions::new().strict());
    let err = converter.convert(&["ok.yaml", "bad.yaml"]).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingField);
    assert!(err.to_string().contains("bad_empty"));
    assert!(converter.model().is_empty());
}

#[test]
fn merge_keys_supply_attribute_fields() {
    let yaml = r#"
name: bird
common: &common
  dataType: int
  nillable: false
entities:
  - name: sighting
    attributes:
      - name: count
        <<: *common
      - name: wingspan
        <<: *common
        dataType: decimal
"#;
    let mut loader = MemoryLoader::new();
    loader.insert_yaml("bird.yaml", yaml).unwrap();

    let mut converter = Converter::with_loader(loader);
    let model = converter.convert(&["bird.yaml"]).unwrap();

    let count = &model.attributes[0];
    assert_eq!(count.name, "count");
    assert_eq!(count.data_type, Some(DataType::Int));
    assert_eq!(count.get(AttributeKey::Nillable), Some(&Value::Bool(false)));

    let wingspan = &model.attributes[1];
    assert_eq!(wingspan.data_type, Some(DataType::Decimal));
    assert_eq!(wingspan.get(AttributeKey::Nillable), Some(&Value::Bool(false)));
}

proptest! {
    #[test]
    fn unknown_data_types_always_fail(value in "x[a-z_]{0,11}") {
        prop_assume!(DataType::ALL.iter().all(|t| t.as_str() != value));

        let mut loader = MemoryLoader::new();
        let yaml = format!(
            "name: p\nentities:\n  - name: t\n    attributes:\n      - name: a\n        dataType: {value}\n"
        );
        loader.insert_yaml("p.yaml", &yaml).unwrap();

        let mut converter = Converter::with_loader(loader);
        let err = converter.convert(&["p.yaml"]).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::TypeValidation);
        prop_assert!(err.to_string().contains(&value));
    }
}
