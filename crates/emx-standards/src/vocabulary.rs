//! The fixed EMX vocabulary: which keys each record type may carry.

use emx_model::{AttributeKey, DataType, EntityKey, PackageKey, TagKey};

/// Key prefixes that mark language variants (`label-nl`, `description-de`).
pub const LANGUAGE_PREFIXES: &[&str] = &["label-", "description-"];

/// Priority-key value that keeps an attribute's original `name`.
pub const SENTINEL: &str = "none";

/// Immutable vocabulary tables shared by the normalizer and the remapper.
#[derive(Debug)]
pub struct Vocabulary {
    package_keys: &'static [PackageKey],
    entity_keys: &'static [EntityKey],
    attribute_keys: &'static [AttributeKey],
    tag_keys: &'static [TagKey],
    data_types: &'static [DataType],
    language_prefixes: &'static [&'static str],
    sentinel: &'static str,
}

static STANDARD: Vocabulary = Vocabulary {
    package_keys: PackageKey::ALL,
    entity_keys: EntityKey::ALL,
    attribute_keys: AttributeKey::ALL,
    tag_keys: TagKey::ALL,
    data_types: DataType::ALL,
    language_prefixes: LANGUAGE_PREFIXES,
    sentinel: SENTINEL,
};

impl Vocabulary {
    pub fn standard() -> &'static Vocabulary {
        &STANDARD
    }

    pub fn package_key(&self, key: &str) -> Option<PackageKey> {
        key.parse()
            .ok()
            .filter(|parsed| self.package_keys.contains(parsed))
    }

    pub fn entity_key(&self, key: &str) -> Option<EntityKey> {
        key.parse()
            .ok()
            .filter(|parsed| self.entity_keys.contains(parsed))
    }

    pub fn attribute_key(&self, key: &str) -> Option<AttributeKey> {
        key.parse()
            .ok()
            .filter(|parsed| self.attribute_keys.contains(parsed))
    }

    pub fn tag_key(&self, key: &str) -> Option<TagKey> {
        key.parse()
            .ok()
            .filter(|parsed| self.tag_keys.contains(parsed))
    }

    pub fn data_type(&self, value: &str) -> Option<DataType> {
        value
            .parse()
            .ok()
            .filter(|parsed| self.data_types.contains(parsed))
    }

    pub fn sentinel(&self) -> &'static str {
        self.sentinel
    }

    /// True for `label-<lang>` / `description-<lang>` keys with a non-empty suffix.
    pub fn is_language_variant(&self, key: &str) -> bool {
        self.language_prefixes.iter().any(|prefix| {
            key.strip_prefix(prefix)
                .is_some_and(|language| !language.is_empty())
        })
    }

    /// Attribute whitelist for one conversion call, optionally widened by a
    /// priority naming key.
    pub fn attribute_whitelist<'a>(
        &'a self,
        priority_key: Option<&'a str>,
    ) -> AttributeWhitelist<'a> {
        AttributeWhitelist {
            vocabulary: self,
            priority_key,
        }
    }
}

/// How a raw attribute key is treated by a whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeField {
    Known(AttributeKey),
    LanguageVariant,
    /// The configured priority naming key.
    Priority,
    Dropped,
}

/// Call-scoped attribute whitelist. The static vocabulary stays untouched.
#[derive(Debug, Clone, Copy)]
pub struct AttributeWhitelist<'a> {
    vocabulary: &'a Vocabulary,
    priority_key: Option<&'a str>,
}

impl AttributeWhitelist<'_> {
    pub fn classify(&self, key: &str) -> AttributeField {
        if self.priority_key == Some(key) {
            return AttributeField::Priority;
        }
        if let Some(known) = self.vocabulary.attribute_key(key) {
            return AttributeField::Known(known);
        }
        if self.vocabulary.is_language_variant(key) {
            return AttributeField::LanguageVariant;
        }
        AttributeField::Dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_variants_need_a_suffix() {
        let vocabulary = Vocabulary::standard();
        assert!(vocabulary.is_language_variant("label-nl"));
        assert!(vocabulary.is_language_variant("description-en"));
        assert!(!vocabulary.is_language_variant("label-"));
        assert!(!vocabulary.is_language_variant("name-nl"));
    }

    #[test]
    fn priority_key_is_scoped_to_its_whitelist() {
        let vocabulary = Vocabulary::standard();
        let widened = vocabulary.attribute_whitelist(Some("name-nl"));
        let plain = vocabulary.attribute_whitelist(None);

        assert_eq!(widened.classify("name-nl"), AttributeField::Priority);
        assert_eq!(plain.classify("name-nl"), AttributeField::Dropped);
        assert_eq!(
            plain.classify("dataType"),
            AttributeField::Known(AttributeKey::DataType)
        );
        assert_eq!(plain.classify("label-fr"), AttributeField::LanguageVariant);
    }

    #[test]
    fn record_keys_are_case_sensitive() {
        let vocabulary = Vocabulary::standard();
        assert_eq!(vocabulary.entity_key("extends"), Some(EntityKey::Extends));
        assert_eq!(vocabulary.entity_key("Extends"), None);
        assert_eq!(vocabulary.tag_key("objectIRI"), Some(TagKey::ObjectIri));
        assert_eq!(vocabulary.package_key("version"), None);
    }
}
