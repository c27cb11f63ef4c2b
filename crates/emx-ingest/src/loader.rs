//! Document loaders.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use emx_model::yaml::stringify_keys;
use emx_model::{EmxError, Mapping, Result, Value};
use tracing::debug;

use crate::document::Document;

/// Loads structured documents by path.
pub trait DocumentLoader {
    fn load(&self, path: &Path) -> Result<Document>;

    fn exists(&self, path: &Path) -> bool;

    /// Load the document named by an `include` directive.
    ///
    /// The path is tried as written first, then relative to the including
    /// document's directory.
    fn load_include(&self, from: &Document, target: &str) -> Result<Document> {
        let path = resolve_include(self, from, target);
        debug!(
            from = %from.path.display(),
            include = %path.display(),
            "resolved include"
        );
        self.load(&path)
    }
}

/// Pick the path an include directive refers to.
pub fn resolve_include<L: DocumentLoader + ?Sized>(
    loader: &L,
    from: &Document,
    target: &str,
) -> PathBuf {
    let as_written = PathBuf::from(target);
    if loader.exists(&as_written) {
        return as_written;
    }
    let relative = from.directory().join(target);
    if loader.exists(&relative) {
        return relative;
    }
    as_written
}

/// Reads YAML files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlLoader;

impl YamlLoader {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentLoader for YamlLoader {
    fn load(&self, path: &Path) -> Result<Document> {
        let text = std::fs::read_to_string(path).map_err(|e| EmxError::io(path, e))?;
        let root = parse_yaml(path, &text)?;
        debug!(path = %path.display(), keys = root.len(), "loaded document");
        Ok(Document::new(path, root))
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Decode YAML text into a document root.
///
/// Merge keys (`<<: *anchor`) are expanded and scalar keys are rewritten to
/// text. An empty document is an empty root.
pub fn parse_yaml(path: &Path, text: &str) -> Result<Mapping> {
    let parse_error = |message: String| EmxError::Parse {
        path: path.to_path_buf(),
        message,
    };
    let mut root: Value = serde_yaml::from_str(text).map_err(|e| parse_error(e.to_string()))?;
    root.apply_merge().map_err(|e| parse_error(e.to_string()))?;
    match stringify_keys(root) {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(parse_error("expected a mapping at the document root".to_string())),
    }
}

/// Serves pre-parsed documents from memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    documents: BTreeMap<PathBuf, Mapping>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, root: Mapping) {
        self.documents.insert(path.into(), root);
    }

    /// Register a document given as YAML text.
    pub fn insert_yaml(&mut self, path: impl Into<PathBuf>, text: &str) -> Result<()> {
        let path = path.into();
        let root = parse_yaml(&path, text)?;
        self.insert(path, root);
        Ok(())
    }
}

impl DocumentLoader for MemoryLoader {
    fn load(&self, path: &Path) -> Result<Document> {
        self.documents
            .get(path)
            .map(|root| Document::new(path, root.clone()))
            .ok_or_else(|| {
                EmxError::io(
                    path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "document not registered"),
                )
            })
    }

    fn exists(&self, path: &Path) -> bool {
        self.documents.contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emx_model::ErrorKind;

    #[test]
    fn include_falls_back_to_including_directory() {
        let mut loader = MemoryLoader::new();
        loader.insert("models/base.yaml", Mapping::new());
        let from = Document::new("models/bird.yaml", Mapping::new());

        assert_eq!(
            resolve_include(&loader, &from, "base.yaml"),
            PathBuf::from("models/base.yaml")
        );
        assert_eq!(
            resolve_include(&loader, &from, "models/base.yaml"),
            PathBuf::from("models/base.yaml")
        );
    }

    #[test]
    fn unknown_document_is_an_io_error() {
        let loader = MemoryLoader::new();
        let err = loader.load(Path::new("missing.yaml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn merge_keys_expand_in_place() {
        let root = parse_yaml(
            Path::new("bird.yaml"),
            "common: &common\n  dataType: int\n  nillable: false\nattribute:\n  name: count\n  <<: *common\n",
        )
        .unwrap();
        let attribute = root.get("attribute").and_then(Value::as_mapping).unwrap();
        assert!(!attribute.contains_key("<<"));
        assert_eq!(attribute.get("dataType"), Some(&Value::from("int")));
        assert_eq!(attribute.get("nillable"), Some(&Value::Bool(false)));
        assert_eq!(attribute.get("name"), Some(&Value::from("count")));
    }

    #[test]
    fn scalar_root_is_a_parse_error() {
        let err = parse_yaml(Path::new("list.yaml"), "- species\n- family\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let mut loader = MemoryLoader::new();
        let err = loader
            .insert_yaml("broken.yaml", "name: [unclosed")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
