use std::path::Path;

use emx_ingest::{Document, parse_yaml};
use emx_model::{Emx2Column, Value};
use emx_transform::{DefaultsMode, RemapOptions, Remapper};

const BIRD: &str = r#"
name: bird
defaults:
  nillable: true
entities:
  - name: species
    description: Bird species
    attributes:
      - name: id
        dataType: string
        idAttribute: true
        nillable: false
      - name: family
        dataType: xref
        refEntity: bird_families
        auto: true
      - name: keeper
        dataType: xref
        refEntity: zoo_keepers
    data:
      - id: robin
      - id: wren
  - name: families
    extends: base
    attributes:
      - name: code
        dataType: long
        idAttribute: false
"#;

fn bird() -> Document {
    let path = Path::new("bird.yaml");
    Document::new(path, parse_yaml(path, BIRD).expect("parse bird"))
}

#[test]
fn remaps_tables_and_columns_in_document_order() {
    let model = Remapper::default().remap(&bird()).expect("remap");

    insta::assert_json_snapshot!(serde_json::to_value(&model.molgenis).unwrap(), @r#"
    [
      {
        "description": "Bird species",
        "tableName": "species"
      },
      {
        "columnName": "id",
        "columnType": "string",
        "key": 1,
        "required": false,
        "tableName": "species"
      },
      {
        "columnName": "family",
        "columnType": "ref",
        "refSchema": "bird",
        "refTable": "families",
        "tableName": "species"
      },
      {
        "columnName": "keeper",
        "columnType": "ref",
        "refSchema": "zoo",
        "refTable": "keepers",
        "tableName": "species"
      },
      {
        "tableExtends": "base",
        "tableName": "families"
      },
      {
        "columnName": "code",
        "columnType": "int",
        "key": 0,
        "tableName": "families"
      }
    ]
    "#);
}

#[test]
fn datasets_are_keyed_by_entity_name() {
    let model = Remapper::default().remap(&bird()).expect("remap");
    assert_eq!(model.datasets.len(), 1);
    assert_eq!(model.datasets[0].name, "species");
    assert_eq!(model.datasets[0].rows.len(), 2);

    let without_data = Remapper::new(RemapOptions::new().with_data(false))
        .remap(&bird())
        .expect("remap");
    assert!(without_data.datasets.is_empty());
}

#[test]
fn backfill_fills_only_missing_columns() {
    let options = RemapOptions::new().with_defaults_mode(DefaultsMode::Backfill);
    let model = Remapper::new(options).remap(&bird()).expect("remap");

    let id = &model.molgenis[1];
    let family = &model.molgenis[2];
    assert_eq!(id.get(Emx2Column::Required), Some(&Value::Bool(true)));
    assert_eq!(family.get(Emx2Column::Required), Some(&Value::Bool(false)));
}

#[test]
fn same_schema_references_can_drop_ref_schema() {
    let options = RemapOptions::new().with_model_package(false);
    let model = Remapper::new(options).remap(&bird()).expect("remap");

    let family = &model.molgenis[2];
    let keeper = &model.molgenis[3];
    assert_eq!(family.get(Emx2Column::RefSchema), None);
    assert_eq!(family.get(Emx2Column::RefTable), Some(&Value::from("families")));
    assert_eq!(keeper.get(Emx2Column::RefSchema), Some(&Value::from("zoo")));
}

#[test]
fn rows_group_under_their_tables() {
    let model = Remapper::default().remap(&bird()).expect("remap");
    assert_eq!(model.rows_for("species").count(), 4);
    assert_eq!(model.rows_for("families").filter(|row| row.is_table_row()).count(), 1);
}

#[test]
fn unknown_data_type_without_defaults_falls_back_to_string() {
    let path = Path::new("notes.yaml");
    let yaml = "name: notes\nentities:\n  - name: entry\n    attributes:\n      - name: body\n        dataType: memo\n";
    let document = Document::new(path, parse_yaml(path, yaml).expect("parse notes"));

    let model = Remapper::default().remap(&document).expect("remap");
    let body = model
        .rows_for("entry")
        .find(|row| row.get(Emx2Column::ColumnName) == Some(&Value::from("body")))
        .expect("body column");
    assert_eq!(body.get(Emx2Column::ColumnType), Some(&Value::from("string")));
}
