//! Schema reports for EMX models.
//!
//! A [`SchemaSummary`] flattens the model into package, entity and attribute
//! views; [`render_schema`] walks it through any [`ReportRenderer`].

mod markdown;
mod summary;

pub use markdown::{
    MarkdownRenderer, PRIMARY_KEY_MARKER, ReportRenderer, render_schema, write_schema,
};
pub use summary::{AttributeRow, AttributeTable, EntityRow, PackageRow, SchemaSummary};
