#![deny(unsafe_code)]

pub mod emx2;
pub mod vocabulary;

pub use crate::emx2::{
    FALLBACK_COLUMN_TYPE, TypeMapping, attribute_column, emx2_type, entity_column, type_mappings,
};
pub use crate::vocabulary::{
    AttributeField, AttributeWhitelist, LANGUAGE_PREFIXES, SENTINEL, Vocabulary,
};
