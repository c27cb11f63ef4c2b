//! Project file (`emx.toml`) for the `build` command.
//!
//! ```toml
//! [convert]
//! files = ["models/bird.yaml", "models/observation.yaml"]
//! name = "birds"
//! format = "xlsx"
//! schema = "docs/schema.md"
//!
//! [[remap]]
//! file = "models/bird.yaml"
//! format = "csv"
//! out_dir = "emx2"
//! ```
//!
//! Relative paths resolve against the directory holding the project file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use emx_output::{OutputFormat, WriteOptions};
use emx_transform::{ConvertOptions, DefaultsMode, RemapOptions, Strictness};
use serde::Deserialize;

use crate::commands::{ConvertJob, RemapJob};

pub const DEFAULT_PROJECT_FILE: &str = "emx.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub convert: Option<ConvertSection>,
    #[serde(default)]
    pub remap: Vec<RemapSection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertSection {
    pub files: Vec<PathBuf>,
    pub name: Option<String>,
    pub format: Option<String>,
    #[serde(default = "current_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "enabled")]
    pub include_pkg_meta: bool,
    pub priority_name_key: Option<String>,
    #[serde(default)]
    pub strict: bool,
    #[serde(default = "enabled")]
    pub include_data: bool,
    /// Markdown schema report destination.
    pub schema: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemapSection {
    pub file: PathBuf,
    pub name: Option<String>,
    pub format: Option<String>,
    #[serde(default = "current_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "enabled")]
    pub include_data: bool,
    #[serde(default)]
    pub defaults: DefaultsMode,
    #[serde(default = "enabled")]
    pub keep_model_package: bool,
}

fn current_dir() -> PathBuf {
    PathBuf::from(".")
}

fn enabled() -> bool {
    true
}

fn parse_format(format: Option<&str>) -> Result<OutputFormat> {
    match format {
        Some(format) => Ok(format.parse()?),
        None => Ok(OutputFormat::default()),
    }
}

impl ProjectConfig {
    /// Read a project file and anchor its relative paths at its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read project file {}", path.display()))?;
        let mut config = Self::parse(&content)
            .with_context(|| format!("parse project file {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.resolve_paths(base);
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        if config.convert.is_none() && config.remap.is_empty() {
            bail!("project file defines neither [convert] nor [[remap]]");
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        if let Some(convert) = &mut self.convert {
            for file in &mut convert.files {
                *file = anchor(base, file);
            }
            convert.out_dir = anchor(base, &convert.out_dir);
            if let Some(schema) = &mut convert.schema {
                *schema = anchor(base, schema);
            }
        }
        for remap in &mut self.remap {
            remap.file = anchor(base, &remap.file);
            remap.out_dir = anchor(base, &remap.out_dir);
        }
    }

    pub fn convert_job(&self) -> Result<Option<ConvertJob>> {
        self.convert.as_ref().map(ConvertSection::job).transpose()
    }

    pub fn remap_jobs(&self) -> Result<Vec<RemapJob>> {
        self.remap.iter().map(RemapSection::job).collect()
    }
}

impl ConvertSection {
    pub fn job(&self) -> Result<ConvertJob> {
        let mut convert = ConvertOptions::new().with_pkg_meta(self.include_pkg_meta);
        if let Some(key) = &self.priority_name_key {
            convert = convert.with_priority_name_key(key.as_str());
        }
        if self.strict {
            convert = convert.with_strictness(Strictness::Strict);
        }

        let mut write = WriteOptions::new()
            .with_format(parse_format(self.format.as_deref())?)
            .with_out_dir(&self.out_dir)
            .with_data(self.include_data);
        write.name = self.name.clone();

        Ok(ConvertJob {
            files: self.files.clone(),
            convert,
            write,
            schema: self.schema.clone(),
        })
    }
}

impl RemapSection {
    pub fn job(&self) -> Result<RemapJob> {
        let remap = RemapOptions::new()
            .with_data(self.include_data)
            .with_defaults_mode(self.defaults)
            .with_model_package(self.keep_model_package);

        let mut write = WriteOptions::new()
            .with_format(parse_format(self.format.as_deref())?)
            .with_out_dir(&self.out_dir)
            .with_data(self.include_data);
        write.name = self.name.clone();

        Ok(RemapJob {
            file: self.file.clone(),
            remap,
            write,
        })
    }
}

fn anchor(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
