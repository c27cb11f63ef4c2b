//! Multi-document conversion into one accumulated EMX model.

use std::path::Path;

use emx_ingest::{DocumentLoader, YamlLoader};
use emx_model::{EmxError, EmxModel, Result};
use emx_standards::Vocabulary;
use tracing::{debug, info, info_span, warn};

use crate::normalizer::{DocumentHeader, Normalizer};
use crate::options::{ConvertOptions, Strictness};

/// Converts EMX-YAML documents into an [`EmxModel`].
///
/// Documents are processed in the order given. Each call to
/// [`convert`](Self::convert) starts from an empty model, and the model is
/// only replaced once every document has been processed.
#[derive(Debug)]
pub struct Converter<L = YamlLoader> {
    loader: L,
    options: ConvertOptions,
    vocabulary: &'static Vocabulary,
    model: EmxModel,
}

impl Converter<YamlLoader> {
    pub fn new() -> Self {
        Self::with_loader(YamlLoader::new())
    }
}

impl Default for Converter<YamlLoader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: DocumentLoader> Converter<L> {
    pub fn with_loader(loader: L) -> Self {
        Self {
            loader,
            options: ConvertOptions::default(),
            vocabulary: Vocabulary::standard(),
            model: EmxModel::default(),
        }
    }

    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: &'static Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn model(&self) -> &EmxModel {
        &self.model
    }

    pub fn into_model(self) -> EmxModel {
        self.model
    }

    /// Convert the given documents, replacing any previously built model.
    pub fn convert<P: AsRef<Path>>(&mut self, documents: &[P]) -> Result<&EmxModel> {
        self.model = EmxModel::default();
        let normalizer = Normalizer::new(self.vocabulary).with_strictness(self.options.strictness);

        let mut scratch = EmxModel::default();
        for path in documents {
            let path = path.as_ref();
            let span = info_span!("document", path = %path.display());
            let _guard = span.enter();
            self.process_document(&normalizer, path, &mut scratch)?;
        }

        info!(
            packages = scratch.packages.len(),
            entities = scratch.entities.len(),
            attributes = scratch.attributes.len(),
            "conversion complete"
        );
        self.model = scratch;
        Ok(&self.model)
    }

    fn process_document(
        &self,
        normalizer: &Normalizer,
        path: &Path,
        model: &mut EmxModel,
    ) -> Result<()> {
        let document = self.loader.load(path)?;
        info!(document = %document.display_name(), "processing document");
        let location = document.path.display().to_string();

        let include = document.include()?;
        if document.name().is_none() && include.is_none() {
            return Err(EmxError::missing_field(location, "name"));
        }
        if self.options.strictness == Strictness::Strict && !document.contains("entities") {
            return Err(EmxError::missing_field(location, "entities"));
        }

        let mut header = DocumentHeader::from_document(&document, self.vocabulary)?;
        let include_meta = self.options.include_pkg_meta;
        match include {
            Some(target) => {
                let included = self.loader.load_include(&document, &target)?;
                let package = normalizer.process_package(&included, include_meta)?;
                header.merge_package(&package);
                if model.has_package(&package.name) {
                    debug!(package = %package.name, "included package already present");
                } else {
                    model.packages.push(package);
                }
            }
            None => {
                let package = normalizer.process_package(&document, include_meta)?;
                if model.has_package(&package.name) {
                    warn!(package = %package.name, "skipping duplicate package");
                } else {
                    model.packages.push(package);
                }
            }
        }

        if document.contains("tagDefinitions") {
            model.tags.extend(normalizer.process_tags(&document)?);
        }

        let priority_key = self.options.priority_name_key.as_deref();
        let extract = normalizer.process_entities(&document, &header, priority_key)?;
        debug!(
            entities = extract.entities.len(),
            attributes = extract.attributes.len(),
            "extracted entities"
        );
        model.entities.extend(extract.entities);
        model.attributes.extend(extract.attributes);
        for dataset in extract.datasets {
            model.upsert_dataset(dataset);
        }
        Ok(())
    }
}
