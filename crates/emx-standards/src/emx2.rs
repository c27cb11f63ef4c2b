//! Cross-format tables from EMX keys and types to their EMX2 equivalents.

use emx_model::{AttributeKey, DataType, Emx2Column, EntityKey};
use serde::Serialize;

/// Column type used when neither the attribute nor the defaults give a valid one.
pub const FALLBACK_COLUMN_TYPE: &str = "string";

/// EMX2 column type for an EMX data type.
pub fn emx2_type(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Categorical | DataType::Xref => "ref",
        DataType::CategoricalMref | DataType::Mref | DataType::OneToMany => "ref_array",
        DataType::Email | DataType::Hyperlink => "string",
        DataType::Long => "int",
        DataType::Compound => "heading",
        other => other.as_str(),
    }
}

/// EMX2 column an attribute key is written to. `refEntity` lands in
/// `refTable`; its schema part is written separately.
pub fn attribute_column(key: AttributeKey) -> Option<Emx2Column> {
    match key {
        AttributeKey::Name => Some(Emx2Column::ColumnName),
        AttributeKey::DataType => Some(Emx2Column::ColumnType),
        AttributeKey::IdAttribute => Some(Emx2Column::Key),
        AttributeKey::Nillable => Some(Emx2Column::Required),
        AttributeKey::RefEntity => Some(Emx2Column::RefTable),
        AttributeKey::ValidationExpression => Some(Emx2Column::Validation),
        AttributeKey::Tags => Some(Emx2Column::Semantics),
        AttributeKey::Description => Some(Emx2Column::Description),
        AttributeKey::Label => Some(Emx2Column::Label),
        _ => None,
    }
}

/// EMX2 column an entity key is written to on the table row.
pub fn entity_column(key: EntityKey) -> Option<Emx2Column> {
    match key {
        EntityKey::Name => Some(Emx2Column::TableName),
        EntityKey::Extends => Some(Emx2Column::TableExtends),
        EntityKey::Description => Some(Emx2Column::Description),
        EntityKey::Tags => Some(Emx2Column::Semantics),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeMapping {
    pub emx: &'static str,
    pub emx2: &'static str,
}

/// Every EMX data type with its EMX2 column type, in vocabulary order.
pub fn type_mappings() -> Vec<TypeMapping> {
    DataType::ALL
        .iter()
        .map(|data_type| TypeMapping {
            emx: data_type.as_str(),
            emx2: emx2_type(*data_type),
        })
        .collect()
}
