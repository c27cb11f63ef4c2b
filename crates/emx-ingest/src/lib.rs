pub mod document;
pub mod loader;

pub use document::Document;
pub use loader::{DocumentLoader, MemoryLoader, YamlLoader, parse_yaml, resolve_include};
