use serde::Serialize;

use crate::yaml::{Mapping, MappingExt, Value};

/// A named table ready for writing: a header and rows aligned to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from records, using the union of their keys in
    /// first-seen order as the header.
    pub fn from_mappings(name: impl Into<String>, records: &[Mapping]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            for (key, _) in record.entries() {
                if !columns.iter().any(|column| column == key) {
                    columns.push(key.to_string());
                }
            }
        }
        let mut table = Self::new(name, columns);
        for record in records {
            table.push_mapping(record);
        }
        table
    }

    /// Append a record, picking cells by header name.
    pub fn push_mapping(&mut self, record: &Mapping) {
        let row = self
            .columns
            .iter()
            .map(|column| record.get(column).cloned().unwrap_or_default())
            .collect();
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
