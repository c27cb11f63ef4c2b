//! Readings over the loaded `serde_yaml` document tree.
//!
//! Documents and dataset rows stay [`serde_yaml::Value`]s end to end. Mapping
//! key order is preserved because it drives column order in the written tables.

pub use serde_yaml::{Mapping, Number, Value};

/// Scalar readings used when folding document values into model fields.
pub trait ValueExt {
    /// Text of a scalar, `None` for null and containers.
    fn to_text(&self) -> Option<String>;

    /// A boolean, also accepting `"true"` / `"false"` written as text.
    fn as_flag(&self) -> Option<bool>;

    /// Truthiness as markup authors expect it: empty and zero values are false.
    fn is_truthy(&self) -> bool;

    /// Table cell rendering. Null is empty, containers render as JSON.
    fn cell_text(&self) -> String;
}

impl ValueExt for Value {
    fn to_text(&self) -> Option<String> {
        match self {
            Value::Bool(flag) => Some(flag.to_string()),
            Value::Number(number) => Some(number.to_string()),
            Value::String(text) => Some(text.clone()),
            Value::Tagged(tagged) => tagged.value.to_text(),
            Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
        }
    }

    fn as_flag(&self) -> Option<bool> {
        if let Some(flag) = self.as_bool() {
            return Some(flag);
        }
        match self.as_str() {
            Some(text) if text.eq_ignore_ascii_case("true") => Some(true),
            Some(text) if text.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(flag) => *flag,
            Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
            Value::String(text) => !text.is_empty(),
            Value::Sequence(items) => !items.is_empty(),
            Value::Mapping(mapping) => !mapping.is_empty(),
            Value::Tagged(tagged) => tagged.value.is_truthy(),
        }
    }

    fn cell_text(&self) -> String {
        match self {
            Value::Sequence(_) | Value::Mapping(_) => {
                serde_json::to_string(self).unwrap_or_default()
            }
            other => other.to_text().unwrap_or_default(),
        }
    }
}

/// String-keyed access to a [`Mapping`].
pub trait MappingExt {
    /// Entries with a text key, in document order.
    fn entries(&self) -> impl Iterator<Item = (&str, &Value)>;

    /// Insert under a text key, replacing an existing entry in place.
    fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value>;
}

impl MappingExt for Mapping {
    fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.iter()
            .filter_map(|(key, value)| key.as_str().map(|key| (key, value)))
    }

    fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.insert(Value::String(key.into()), value.into())
    }
}

/// Rewrite scalar mapping keys (`1: one`, `true: yes`) to their text form.
///
/// Recurses through sequences and mappings; container keys are kept as is.
pub fn stringify_keys(value: Value) -> Value {
    match value {
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(key, value)| {
                    let key = match key {
                        Value::String(_) => key,
                        other => other.to_text().map_or(other, Value::String),
                    };
                    (key, stringify_keys(value))
                })
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(stringify_keys).collect()),
        other => other,
    }
}
