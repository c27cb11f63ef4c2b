use emx_model::{Attribute, AttributeKey, DataType, EmxModel, Entity, Package};
use emx_report::{MarkdownRenderer, ReportRenderer, SchemaSummary, render_schema, write_schema};

fn bird_model() -> EmxModel {
    let mut package = Package::new("bird");
    package.description = Some("Bird observations".to_string());

    let mut species = Entity::new("bird", "species");
    species.description = Some("Observed species".to_string());
    let sites = Entity::new("bird", "sites");

    let mut id = Attribute::new("bird_species", "id")
        .with_property(AttributeKey::IdAttribute, true)
        .with_property(AttributeKey::Label, "Identifier");
    id.data_type = Some(DataType::String);
    let count = Attribute::new("bird_species", "count");

    EmxModel {
        packages: vec![package],
        entities: vec![species, sites],
        attributes: vec![id, count],
        ..EmxModel::default()
    }
}

#[test]
fn summary_skips_entities_without_attributes() {
    let summary = SchemaSummary::from_model(&bird_model());

    insta::assert_json_snapshot!(serde_json::to_value(&summary).unwrap(), @r#"
    {
      "attribute_tables": [
        {
          "attributes": [
            {
              "data_type": "string",
              "description": null,
              "label": "Identifier",
              "name": "id",
              "primary_key": true
            },
            {
              "data_type": null,
              "description": null,
              "label": null,
              "name": "count",
              "primary_key": false
            }
          ],
          "description": "Observed species",
          "entity": "bird_species"
        }
      ],
      "entities": [
        {
          "description": "Observed species",
          "name": "species",
          "package": "bird"
        },
        {
          "description": null,
          "name": "sites",
          "package": "bird"
        }
      ],
      "packages": [
        {
          "description": "Bird observations",
          "name": "bird",
          "parent": null
        }
      ]
    }
    "#);
}

#[test]
fn markdown_has_sections_in_order() {
    let summary = SchemaSummary::from_model(&bird_model());
    let mut renderer = MarkdownRenderer::new();
    render_schema(&summary, &mut renderer);
    let markdown = renderer.finish();

    let sections = [
        "# Model Schema",
        "## Packages",
        "## Entities",
        "## Attributes",
        "### Entity: bird_species",
        "Observed species",
        "Note: The symbol ※ denotes attributes that are primary keys",
    ];
    let mut cursor = 0;
    for section in sections {
        let found = markdown[cursor..]
            .find(section)
            .unwrap_or_else(|| panic!("missing {section:?} in:\n{markdown}"));
        cursor += found + section.len();
    }

    assert!(!markdown.contains("Entity: bird_sites"));
    assert!(markdown.lines().any(|line| line.starts_with("| id※") && line.contains("Identifier")));
    assert!(markdown.lines().any(|line| line.starts_with("| count") && line.contains("| -")));
    assert!(markdown.ends_with("primary keys\n"));
}

#[derive(Default)]
struct Outline {
    headings: Vec<(usize, String)>,
    tables: usize,
}

impl ReportRenderer for Outline {
    fn heading(&mut self, level: usize, title: &str) {
        self.headings.push((level, title.to_string()));
    }

    fn paragraph(&mut self, _text: &str) {}

    fn table(&mut self, _header: &[&str], _rows: &[Vec<String>]) {
        self.tables += 1;
    }
}

#[test]
fn renderer_receives_one_table_per_section() {
    let summary = SchemaSummary::from_model(&bird_model());
    let mut outline = Outline::default();
    render_schema(&summary, &mut outline);

    assert_eq!(outline.tables, 3);
    assert_eq!(outline.headings[0], (1, "Model Schema".to_string()));
    assert_eq!(outline.headings.last(), Some(&(3, "Entity: bird_species".to_string())));
}

#[test]
fn schema_report_is_written_to_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("schema.md");
    write_schema(&bird_model(), &path).expect("write schema");

    let contents = std::fs::read_to_string(&path).expect("read schema");
    assert!(contents.starts_with("# Model Schema\n"));
}
