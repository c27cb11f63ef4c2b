//! EMX output generation.
//!
//! Models are projected onto [`Table`](emx_model::Table)s and handed to a
//! [`TableWriter`]: one csv file per table, or one xlsx workbook.

pub mod format;
pub mod projection;
pub mod write;
pub mod writer;

pub use format::OutputFormat;
pub use projection::{emx2_tables, model_tables};
pub use write::{WriteOptions, write_emx2, write_model, write_tables};
pub use writer::{CsvWriter, TableWriter, WrittenTable, XlsxWriter};
