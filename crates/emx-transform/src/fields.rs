//! Coercion of raw document values into typed record fields.

use emx_model::{EmxError, Mapping, Result, Value, ValueExt};

/// Scalar as text; null is absent, containers are rejected.
pub(crate) fn optional_text(value: &Value, location: &str, field: &str) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::Sequence(_) | Value::Mapping(_) => Err(EmxError::invalid_value(
            location,
            field,
            "expected a scalar value",
        )),
        other => Ok(other.to_text()),
    }
}

pub(crate) fn optional_bool(value: &Value, location: &str, field: &str) -> Result<Option<bool>> {
    match value {
        Value::Null => Ok(None),
        other => other.as_flag().map(Some).ok_or_else(|| {
            EmxError::invalid_value(
                location,
                field,
                format!("expected true or false, got `{}`", other.cell_text()),
            )
        }),
    }
}

/// Entries of a list that must all be mappings.
pub(crate) fn mapping_list<'a>(
    value: &'a Value,
    location: &str,
    field: &str,
) -> Result<Vec<&'a Mapping>> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(items) => items,
        _ => {
            return Err(EmxError::invalid_value(
                location,
                field,
                "expected a list of mappings",
            ));
        }
    };
    items
        .iter()
        .map(|item| {
            item.as_mapping().ok_or_else(|| {
                EmxError::invalid_value(
                    location,
                    field,
                    format!("expected a mapping, got `{}`", item.cell_text()),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use emx_model::ErrorKind;

    #[test]
    fn scalars_coerce_to_text() {
        assert_eq!(
            optional_text(&Value::from(2), "bird", "label").unwrap(),
            Some("2".to_string())
        );
        assert_eq!(optional_text(&Value::Null, "bird", "label").unwrap(), None);
        let err = optional_text(&Value::Sequence(Vec::new()), "bird", "label").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn booleans_accept_text_forms() {
        assert_eq!(
            optional_bool(&Value::from("true"), "species", "abstract").unwrap(),
            Some(true)
        );
        assert!(optional_bool(&Value::from("maybe"), "species", "abstract").is_err());
    }

    #[test]
    fn mapping_list_rejects_scalars() {
        let value = Value::Sequence(vec![Value::Mapping(Mapping::new()), Value::from("oops")]);
        assert!(mapping_list(&value, "bird", "entities").is_err());
        assert!(mapping_list(&Value::Null, "bird", "entities").unwrap().is_empty());
    }
}
