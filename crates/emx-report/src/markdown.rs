//! Rendering of a [`SchemaSummary`] as a markdown document.

use std::path::Path;

use comfy_table::Table;
use comfy_table::presets::ASCII_MARKDOWN;
use emx_model::{EmxError, EmxModel, Result};
use tracing::info;

use crate::summary::SchemaSummary;

/// Marker appended to the names of primary-key attributes.
pub const PRIMARY_KEY_MARKER: &str = "※";

const MISSING: &str = "-";

/// Sink for the building blocks of a report.
pub trait ReportRenderer {
    fn heading(&mut self, level: usize, title: &str);

    fn paragraph(&mut self, text: &str);

    fn table(&mut self, header: &[&str], rows: &[Vec<String>]);
}

/// Accumulates markdown text.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    output: String,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    /// The finished document, ending in a single newline.
    pub fn finish(self) -> String {
        let mut output = self.output.trim_end().to_string();
        output.push('\n');
        output
    }
}

impl ReportRenderer for MarkdownRenderer {
    fn heading(&mut self, level: usize, title: &str) {
        let level = level.clamp(1, 6);
        self.output.push_str(&"#".repeat(level));
        self.output.push(' ');
        self.output.push_str(title);
        self.output.push_str("\n\n");
    }

    fn paragraph(&mut self, text: &str) {
        self.output.push_str(text.trim());
        self.output.push_str("\n\n");
    }

    fn table(&mut self, header: &[&str], rows: &[Vec<String>]) {
        let mut table = Table::new();
        table.load_preset(ASCII_MARKDOWN);
        table.set_header(header.iter().map(|title| escape_cell(title)));
        for row in rows {
            table.add_row(row.iter().map(|cell| escape_cell(cell)));
        }
        self.output.push_str(&table.to_string());
        self.output.push_str("\n\n");
    }
}

/// Render the summary: packages, entities, then one attribute table per entity.
pub fn render_schema<R: ReportRenderer>(summary: &SchemaSummary, renderer: &mut R) {
    renderer.heading(1, "Model Schema");

    renderer.heading(2, "Packages");
    let packages: Vec<Vec<String>> = summary
        .packages
        .iter()
        .map(|package| {
            vec![
                package.name.clone(),
                or_missing(package.description.as_deref()),
                or_missing(package.parent.as_deref()),
            ]
        })
        .collect();
    renderer.table(&["Name", "Description", "Parent"], &packages);

    renderer.heading(2, "Entities");
    let entities: Vec<Vec<String>> = summary
        .entities
        .iter()
        .map(|entity| {
            vec![
                entity.name.clone(),
                or_missing(entity.description.as_deref()),
                entity.package.clone(),
            ]
        })
        .collect();
    renderer.table(&["Name", "Description", "Package"], &entities);

    renderer.heading(2, "Attributes");
    for table in &summary.attribute_tables {
        renderer.heading(3, &format!("Entity: {}", table.entity));
        if let Some(description) = &table.description {
            renderer.paragraph(description);
        }
        let rows: Vec<Vec<String>> = table
            .attributes
            .iter()
            .map(|attribute| {
                let name = if attribute.primary_key {
                    format!("{}{PRIMARY_KEY_MARKER}", attribute.name)
                } else {
                    attribute.name.clone()
                };
                vec![
                    name,
                    or_missing(attribute.label.as_deref()),
                    or_missing(attribute.description.as_deref()),
                    or_missing(attribute.data_type.as_deref()),
                ]
            })
            .collect();
        renderer.table(&["Name", "Label", "Description", "Data Type"], &rows);
    }

    renderer.paragraph(&format!(
        "Note: The symbol {PRIMARY_KEY_MARKER} denotes attributes that are primary keys"
    ));
}

/// Render the model's schema report to a markdown file.
pub fn write_schema(model: &EmxModel, path: &Path) -> Result<()> {
    let summary = SchemaSummary::from_model(model);
    let mut renderer = MarkdownRenderer::new();
    render_schema(&summary, &mut renderer);
    std::fs::write(path, renderer.finish()).map_err(|e| EmxError::io(path, e))?;
    info!(
        path = %path.display(),
        entities = summary.attribute_tables.len(),
        "wrote schema report"
    );
    Ok(())
}

fn or_missing(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => MISSING.to_string(),
    }
}

/// Keep cell text on one line and away from column separators.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}
