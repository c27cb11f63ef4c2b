//! Target records for the EMX2 `molgenis` sheet.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::enums::Emx2Column;
use crate::model::Dataset;
use crate::yaml::Value;

/// One row of the `molgenis` sheet: an entity row or one of its columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Emx2Row {
    #[serde(rename = "tableName")]
    pub table_name: String,
    #[serde(flatten)]
    pub cells: BTreeMap<Emx2Column, Value>,
}

impl Emx2Row {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            cells: BTreeMap::new(),
        }
    }

    pub fn get(&self, column: Emx2Column) -> Option<&Value> {
        match column {
            Emx2Column::TableName => None,
            other => self.cells.get(&other),
        }
    }

    pub fn set(&mut self, column: Emx2Column, value: impl Into<Value>) {
        if column != Emx2Column::TableName {
            self.cells.insert(column, value.into());
        }
    }

    /// True for the row describing the table itself rather than a column.
    pub fn is_table_row(&self) -> bool {
        !self.cells.contains_key(&Emx2Column::ColumnName)
    }
}

/// Remapped schema plus the datasets that travel with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Emx2Model {
    pub molgenis: Vec<Emx2Row>,
    pub datasets: Vec<Dataset>,
}

impl Emx2Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows_for<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a Emx2Row> {
        self.molgenis.iter().filter(move |row| row.table_name == table)
    }
}
