//! Core model types for EMX schema conversion.

pub mod emx2;
pub mod entity;
pub mod enums;
pub mod error;
pub mod model;
pub mod package;
pub mod table;
pub mod tag;
pub mod yaml;

pub use emx2::{Emx2Model, Emx2Row};
pub use entity::{Attribute, Entity, entity_id};
pub use enums::{AttributeKey, DataType, Emx2Column, EntityKey, PackageKey, TagKey};
pub use error::{EmxError, ErrorKind, Result};
pub use model::{Dataset, EmxModel};
pub use package::Package;
pub use table::Table;
pub use tag::Tag;
pub use yaml::{Mapping, MappingExt, Number, Value, ValueExt};
