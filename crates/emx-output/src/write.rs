//! Entry points that validate write arguments and dispatch to a writer.

use std::path::PathBuf;

use emx_model::{Emx2Model, EmxError, EmxModel, Result, Table};
use serde::{Deserialize, Serialize};
use tracing::info_span;

use crate::format::OutputFormat;
use crate::projection::{emx2_tables, model_tables};
use crate::writer::{CsvWriter, TableWriter, WrittenTable, XlsxWriter};

/// Where and how a model is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOptions {
    /// Workbook file stem; required for xlsx output.
    pub name: Option<String>,
    pub format: OutputFormat,
    pub out_dir: PathBuf,
    pub include_data: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            name: None,
            format: OutputFormat::default(),
            out_dir: PathBuf::from("."),
            include_data: true,
        }
    }
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    pub fn with_data(mut self, include: bool) -> Self {
        self.include_data = include;
        self
    }

    /// Path of the workbook for xlsx output.
    pub fn workbook_path(&self) -> Result<PathBuf> {
        let name = self
            .name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| EmxError::MissingArgument {
                argument: "name".to_string(),
            })?;
        Ok(self.out_dir.join(format!("{name}.{}", OutputFormat::Xlsx.extension())))
    }
}

/// Write a converted model as packages/entities/attributes tables.
pub fn write_model(model: &EmxModel, options: &WriteOptions) -> Result<Vec<WrittenTable>> {
    let span = info_span!("write_model", format = %options.format);
    let _guard = span.enter();
    write_tables(&model_tables(model, options.include_data), options)
}

/// Write a remapped model as the `molgenis` table plus datasets.
pub fn write_emx2(model: &Emx2Model, options: &WriteOptions) -> Result<Vec<WrittenTable>> {
    let span = info_span!("write_emx2", format = %options.format);
    let _guard = span.enter();
    write_tables(&emx2_tables(model, options.include_data), options)
}

pub fn write_tables(tables: &[Table], options: &WriteOptions) -> Result<Vec<WrittenTable>> {
    match options.format {
        OutputFormat::Csv => CsvWriter::new(&options.out_dir).write_tables(tables),
        OutputFormat::Xlsx => XlsxWriter::new(options.workbook_path()?).write_tables(tables),
    }
}
