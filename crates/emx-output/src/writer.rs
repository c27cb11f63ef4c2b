//! Table writers for delimited files and workbooks.

use std::path::{Path, PathBuf};

use emx_model::{EmxError, Number, Result, Table, Value, ValueExt};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use serde::Serialize;
use tracing::{debug, info};

/// One table as it landed on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenTable {
    pub name: String,
    pub rows: usize,
    pub path: PathBuf,
}

/// Writes named tables with their column order.
pub trait TableWriter {
    fn write_tables(&self, tables: &[Table]) -> Result<Vec<WrittenTable>>;
}

/// Writes each table to `<dir>/<table>.csv`.
#[derive(Debug, Clone)]
pub struct CsvWriter {
    dir: PathBuf,
}

impl CsvWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn write_table(&self, table: &Table) -> Result<PathBuf> {
        let path = self.dir.join(format!("{}.csv", table.name));
        let mut writer = csv::Writer::from_path(&path).map_err(|e| EmxError::write(&path, e))?;
        writer
            .write_record(&table.columns)
            .map_err(|e| EmxError::write(&path, e))?;
        for row in &table.rows {
            writer
                .write_record(row.iter().map(ValueExt::cell_text))
                .map_err(|e| EmxError::write(&path, e))?;
        }
        writer.flush().map_err(|e| EmxError::io(&path, e))?;
        Ok(path)
    }
}

impl TableWriter for CsvWriter {
    fn write_tables(&self, tables: &[Table]) -> Result<Vec<WrittenTable>> {
        ensure_directory(&self.dir)?;
        let mut written = Vec::with_capacity(tables.len());
        for table in tables {
            let path = self.write_table(table)?;
            debug!(table = %table.name, rows = table.row_count(), path = %path.display(), "wrote csv");
            written.push(WrittenTable {
                name: table.name.clone(),
                rows: table.row_count(),
                path,
            });
        }
        info!(dir = %self.dir.display(), tables = written.len(), "csv output complete");
        Ok(written)
    }
}

/// Writes all tables into one workbook, a sheet per table.
#[derive(Debug, Clone)]
pub struct XlsxWriter {
    path: PathBuf,
}

impl XlsxWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableWriter for XlsxWriter {
    fn write_tables(&self, tables: &[Table]) -> Result<Vec<WrittenTable>> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            ensure_directory(parent)?;
        }
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|e| EmxError::io(&self.path, e))?;
            debug!(path = %self.path.display(), "removed existing workbook");
        }

        let mut workbook = Workbook::new();
        for table in tables {
            let worksheet = workbook.add_worksheet();
            fill_sheet(worksheet, table).map_err(|e| {
                EmxError::write(&self.path, format!("sheet `{}`: {e}", table.name))
            })?;
        }
        workbook
            .save(&self.path)
            .map_err(|e| EmxError::write(&self.path, e))?;

        info!(path = %self.path.display(), sheets = tables.len(), "xlsx output complete");
        Ok(tables
            .iter()
            .map(|table| WrittenTable {
                name: table.name.clone(),
                rows: table.row_count(),
                path: self.path.clone(),
            })
            .collect())
    }
}

fn fill_sheet(worksheet: &mut Worksheet, table: &Table) -> std::result::Result<(), XlsxError> {
    worksheet.set_name(&table.name)?;
    for (col, column) in (0u16..).zip(&table.columns) {
        worksheet.write_string(0, col, column)?;
    }
    for (row_index, row) in (1u32..).zip(&table.rows) {
        for (col, value) in (0u16..).zip(row) {
            match value {
                Value::Null => {}
                Value::Bool(flag) => {
                    worksheet.write_boolean(row_index, col, *flag)?;
                }
                Value::Number(number) => match exact_number(number) {
                    Some(number) => {
                        worksheet.write_number(row_index, col, number)?;
                    }
                    None => {
                        worksheet.write_string(row_index, col, number.to_string())?;
                    }
                },
                other => {
                    worksheet.write_string(row_index, col, other.cell_text())?;
                }
            }
        }
    }
    Ok(())
}

/// Largest integer magnitude an xlsx number cell holds without rounding.
const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// The number as an xlsx cell value, `None` when it would not survive as f64.
fn exact_number(number: &Number) -> Option<f64> {
    if let Some(int) = number.as_i64() {
        return (int.unsigned_abs() <= MAX_EXACT_INTEGER).then_some(int as f64);
    }
    if let Some(int) = number.as_u64() {
        return (int <= MAX_EXACT_INTEGER).then_some(int as f64);
    }
    number.as_f64().filter(|float| float.is_finite())
}

fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(EmxError::DirectoryNotFound {
            path: dir.to_path_buf(),
        })
    }
}
