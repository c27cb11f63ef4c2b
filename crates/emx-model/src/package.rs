use std::collections::BTreeMap;

use serde::Serialize;

use crate::yaml::Value;

/// A package record: the namespace one document contributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Package {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// `label-<lang>` and `description-<lang>` variants.
    #[serde(flatten)]
    pub i18n: BTreeMap<String, Value>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Fold release information (`v1.2`, `2021-09-01`) into the description.
    ///
    /// An existing description gets the parts as a parenthetical suffix; a
    /// missing one becomes the joined parts.
    pub fn fold_release_info(&mut self, parts: &[String]) {
        if parts.is_empty() {
            return;
        }
        let joined = parts.join(", ");
        self.description = Some(match self.description.take() {
            Some(description) => format!("{description} ({joined})"),
            None => joined,
        });
    }
}
