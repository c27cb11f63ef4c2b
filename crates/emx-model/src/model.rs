use serde::Serialize;

use crate::entity::{Attribute, Entity};
use crate::package::Package;
use crate::tag::Tag;
use crate::yaml::Mapping;

/// Literal rows embedded under an entity's `data` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub name: String,
    pub rows: Vec<Mapping>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, rows: Vec<Mapping>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// Accumulated EMX model across one or more documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmxModel {
    pub packages: Vec<Package>,
    pub entities: Vec<Entity>,
    pub attributes: Vec<Attribute>,
    pub tags: Vec<Tag>,
    pub datasets: Vec<Dataset>,
}

impl EmxModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
            && self.entities.is_empty()
            && self.attributes.is_empty()
            && self.tags.is_empty()
            && self.datasets.is_empty()
    }

    pub fn has_package(&self, name: &str) -> bool {
        self.packages.iter().any(|package| package.name == name)
    }

    /// Attributes declared under the entity with the given identity key.
    pub fn attributes_of<'a>(&'a self, entity_id: &'a str) -> impl Iterator<Item = &'a Attribute> {
        self.attributes
            .iter()
            .filter(move |attribute| attribute.entity == entity_id)
    }

    /// Insert a dataset; a same-named dataset is replaced where it stands.
    pub fn upsert_dataset(&mut self, dataset: Dataset) {
        match self
            .datasets
            .iter_mut()
            .find(|existing| existing.name == dataset.name)
        {
            Some(existing) => *existing = dataset,
            None => self.datasets.push(dataset),
        }
    }
}
