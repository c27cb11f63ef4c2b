//! Options for conversion and remapping.

use serde::{Deserialize, Serialize};

/// How strictly document structure is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Every document needs `entities`, every entity a non-empty `attributes` list.
    Strict,
    /// Package-only documents and attribute-less entities are accepted.
    #[default]
    Relaxed,
}

/// Options for [`Converter`](crate::Converter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Fold `version` and `date` into the package description.
    pub include_pkg_meta: bool,
    /// Attribute key whose value replaces `name` when present.
    pub priority_name_key: Option<String>,
    pub strictness: Strictness,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            include_pkg_meta: true,
            priority_name_key: None,
            strictness: Strictness::default(),
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pkg_meta(mut self, include: bool) -> Self {
        self.include_pkg_meta = include;
        self
    }

    pub fn with_priority_name_key(mut self, key: impl Into<String>) -> Self {
        self.priority_name_key = Some(key.into());
        self
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn strict(self) -> Self {
        self.with_strictness(Strictness::Strict)
    }
}

/// How document `defaults` combine with values an attribute declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultsMode {
    /// A default replaces the attribute's own value for the same key.
    #[default]
    Override,
    /// Defaults only fill keys the attribute does not declare.
    Backfill,
}

/// Options for [`Remapper`](crate::Remapper).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapOptions {
    /// Carry embedded `data` rows into dataset tables.
    pub include_data: bool,
    pub defaults_mode: DefaultsMode,
    /// Always write `refSchema`, even for references into the same document.
    pub keep_model_package: bool,
}

impl Default for RemapOptions {
    fn default() -> Self {
        Self {
            include_data: true,
            defaults_mode: DefaultsMode::default(),
            keep_model_package: true,
        }
    }
}

impl RemapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(mut self, include: bool) -> Self {
        self.include_data = include;
        self
    }

    pub fn with_defaults_mode(mut self, mode: DefaultsMode) -> Self {
        self.defaults_mode = mode;
        self
    }

    pub fn with_model_package(mut self, keep: bool) -> Self {
        self.keep_model_package = keep;
        self
    }
}
