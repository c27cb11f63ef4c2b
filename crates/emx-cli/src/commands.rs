use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use comfy_table::Table;
use tracing::{info, info_span};

use emx_ingest::{DocumentLoader, YamlLoader};
use emx_output::{WriteOptions, WrittenTable, write_emx2, write_model};
use emx_report::write_schema;
use emx_standards::type_mappings;
use emx_transform::{ConvertOptions, Converter, RemapOptions, Remapper};

use crate::config::ProjectConfig;
use crate::summary::{apply_table_style, header_cell};

/// Documents to fold into one model and where the result goes.
#[derive(Debug, Clone)]
pub struct ConvertJob {
    pub files: Vec<PathBuf>,
    pub convert: ConvertOptions,
    pub write: WriteOptions,
    /// Markdown schema report destination.
    pub schema: Option<PathBuf>,
}

/// One document to remap to EMX2.
#[derive(Debug, Clone)]
pub struct RemapJob {
    pub file: PathBuf,
    pub remap: RemapOptions,
    /// Output settings; the workbook name defaults to the schema name.
    pub write: WriteOptions,
}

/// What a finished command produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub command: &'static str,
    pub label: String,
    pub tables: Vec<WrittenTable>,
    pub schema: Option<PathBuf>,
}

impl RunReport {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|table| table.rows).sum()
    }
}

pub fn run_convert(job: &ConvertJob) -> Result<RunReport> {
    let span = info_span!("convert", documents = job.files.len());
    let _guard = span.enter();
    let start = Instant::now();

    if job.files.is_empty() {
        bail!("no input documents given");
    }

    let mut converter = Converter::new().with_options(job.convert.clone());
    let model = converter
        .convert(&job.files)
        .context("convert documents")?;
    let tables = write_model(model, &job.write).context("write converted model")?;

    if let Some(path) = &job.schema {
        write_schema(model, path)
            .with_context(|| format!("write schema report {}", path.display()))?;
    }

    info!(
        packages = model.packages.len(),
        entities = model.entities.len(),
        attributes = model.attributes.len(),
        tables = tables.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "conversion complete"
    );

    let label = job
        .write
        .name
        .clone()
        .unwrap_or_else(|| job.write.out_dir.display().to_string());
    Ok(RunReport {
        command: "convert",
        label,
        tables,
        schema: job.schema.clone(),
    })
}

pub fn run_remap(job: &RemapJob) -> Result<RunReport> {
    let span = info_span!("remap", file = %job.file.display());
    let _guard = span.enter();
    let start = Instant::now();

    let document = YamlLoader::new()
        .load(&job.file)
        .with_context(|| format!("load {}", job.file.display()))?;
    let model = Remapper::new(job.remap)
        .remap(&document)
        .with_context(|| format!("remap {}", job.file.display()))?;

    let mut write = job.write.clone();
    let label = write
        .name
        .get_or_insert_with(|| document.schema_name())
        .clone();
    let tables = write_emx2(&model, &write).context("write remapped model")?;

    info!(
        rows = model.molgenis.len(),
        datasets = model.datasets.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "remap complete"
    );

    Ok(RunReport {
        command: "remap",
        label,
        tables,
        schema: None,
    })
}

/// Run every job a project file declares: `[convert]` first, then each
/// `[[remap]]` entry in order.
pub fn run_build(config_path: &Path) -> Result<Vec<RunReport>> {
    let span = info_span!("build", config = %config_path.display());
    let _guard = span.enter();

    let config = ProjectConfig::load(config_path)?;
    let mut reports = Vec::new();
    if let Some(job) = config.convert_job()? {
        reports.push(run_convert(&job)?);
    }
    for job in config.remap_jobs()? {
        reports.push(run_remap(&job)?);
    }
    Ok(reports)
}

/// The EMX type vocabulary with the EMX2 column type each one maps to.
pub fn datatype_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("EMX dataType"), header_cell("EMX2 columnType")]);
    apply_table_style(&mut table);
    for mapping in type_mappings() {
        table.add_row(vec![mapping.emx, mapping.emx2]);
    }
    table
}

pub fn run_datatypes() -> Result<()> {
    println!("{}", datatype_table());
    Ok(())
}
