use std::path::{Path, PathBuf};

use emx_model::{EmxError, Mapping, Result, Value, ValueExt};

/// A loaded markup document and the path it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: PathBuf,
    pub root: Mapping,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, root: Mapping) -> Self {
        Self {
            path: path.into(),
            root,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }

    /// Declared package name, when it is a scalar.
    pub fn name(&self) -> Option<String> {
        self.get("name").and_then(ValueExt::to_text)
    }

    /// Declared name, falling back to the file stem.
    pub fn schema_name(&self) -> String {
        self.name().unwrap_or_else(|| {
            self.path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }

    /// Path of the document named by `include`, as written.
    ///
    /// # Errors
    ///
    /// Returns [`EmxError::InvalidValue`] when `include` is not a scalar.
    pub fn include(&self) -> Result<Option<String>> {
        match self.get("include") {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value.to_text().map(Some).ok_or_else(|| {
                EmxError::invalid_value(self.path.display().to_string(), "include", "expected a path")
            }),
        }
    }

    pub fn defaults(&self) -> Option<&Mapping> {
        self.get("defaults").and_then(Value::as_mapping)
    }

    /// Directory include paths are resolved against.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// File name used in log lines.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
