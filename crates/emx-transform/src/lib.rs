//! EMX model normalization and EMX2 remapping.
//!
//! [`Converter`] folds any number of EMX-YAML documents into one
//! [`EmxModel`](emx_model::EmxModel); [`Remapper`] projects a single document
//! onto the EMX2 `molgenis` layout.

pub mod convert;
pub mod defaults;
mod fields;
pub mod normalizer;
pub mod options;
pub mod remap;

pub use convert::Converter;
pub use defaults::AttributeDefaults;
pub use normalizer::{DocumentHeader, EntityExtract, Normalizer};
pub use options::{ConvertOptions, DefaultsMode, RemapOptions, Strictness};
pub use remap::Remapper;
