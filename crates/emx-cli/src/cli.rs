//! CLI argument definitions for the `emx` tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use emx_cli::commands::{ConvertJob, RemapJob};
use emx_cli::config::DEFAULT_PROJECT_FILE;
use emx_model::EmxError;
use emx_output::{OutputFormat, WriteOptions};
use emx_transform::{ConvertOptions, DefaultsMode, RemapOptions, Strictness};

#[derive(Parser)]
#[command(
    name = "emx",
    version,
    about = "Convert EMX-YAML models to EMX workbooks and EMX2 schemas",
    long_about = "Convert EMX-YAML model documents into EMX tables (xlsx or csv),\n\
                  remap single documents onto the EMX2 molgenis layout, and\n\
                  render markdown schema reports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fold EMX-YAML documents into one EMX model and write it.
    Convert(ConvertArgs),

    /// Remap one EMX-YAML document to the EMX2 molgenis layout.
    Remap(RemapArgs),

    /// Run the jobs declared in a project file.
    Build(BuildArgs),

    /// List the EMX data types and their EMX2 column types.
    Datatypes,
}

/// Output arguments shared by `convert` and `remap`.
#[derive(Args)]
pub struct OutputArgs {
    /// Workbook name (required for xlsx output).
    #[arg(long = "name", short = 'n')]
    pub name: Option<String>,

    /// Output format: csv or xlsx.
    #[arg(long = "format", short = 'f', default_value = "xlsx", value_parser = parse_format)]
    pub format: OutputFormat,

    /// Directory that receives the output; must exist.
    #[arg(long = "out-dir", short = 'o', value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Leave embedded `data` rows out of the output.
    #[arg(long = "no-data")]
    pub no_data: bool,
}

impl OutputArgs {
    fn write_options(&self) -> WriteOptions {
        let mut options = WriteOptions::new()
            .with_format(self.format)
            .with_out_dir(&self.out_dir)
            .with_data(!self.no_data);
        options.name = self.name.clone();
        options
    }
}

#[derive(Args)]
pub struct ConvertArgs {
    /// EMX-YAML documents, processed in the given order.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Do not fold `version` and `date` into package descriptions.
    #[arg(long = "no-pkg-meta")]
    pub no_pkg_meta: bool,

    /// Attribute key whose value replaces `name` (e.g. `name-nl`).
    #[arg(long = "priority-name-key", value_name = "KEY")]
    pub priority_name_key: Option<String>,

    /// Require `entities` on every document and `attributes` on every entity.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Also write a markdown schema report to this path.
    #[arg(long = "schema", value_name = "PATH")]
    pub schema: Option<PathBuf>,
}

impl ConvertArgs {
    pub fn job(&self) -> ConvertJob {
        let mut convert = ConvertOptions::new().with_pkg_meta(!self.no_pkg_meta);
        if let Some(key) = &self.priority_name_key {
            convert = convert.with_priority_name_key(key.as_str());
        }
        if self.strict {
            convert = convert.with_strictness(Strictness::Strict);
        }
        ConvertJob {
            files: self.files.clone(),
            convert,
            write: self.output.write_options(),
            schema: self.schema.clone(),
        }
    }
}

#[derive(Args)]
pub struct RemapArgs {
    /// EMX-YAML document to remap.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,

    /// How document defaults combine with attribute values.
    #[arg(long = "defaults", value_enum, default_value = "override")]
    pub defaults: DefaultsArg,

    /// Omit `refSchema` for references into the same document.
    #[arg(long = "drop-model-package")]
    pub drop_model_package: bool,
}

impl RemapArgs {
    pub fn job(&self) -> RemapJob {
        let remap = RemapOptions::new()
            .with_data(!self.output.no_data)
            .with_defaults_mode(self.defaults.into())
            .with_model_package(!self.drop_model_package);
        RemapJob {
            file: self.file.clone(),
            remap,
            write: self.output.write_options(),
        }
    }
}

#[derive(Args)]
pub struct BuildArgs {
    /// Project file to read.
    #[arg(long = "config", short = 'c', value_name = "PATH", default_value = DEFAULT_PROJECT_FILE)]
    pub config: PathBuf,
}

fn parse_format(value: &str) -> Result<OutputFormat, EmxError> {
    value.parse()
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DefaultsArg {
    Override,
    Backfill,
}

impl From<DefaultsArg> for DefaultsMode {
    fn from(value: DefaultsArg) -> Self {
        match value {
            DefaultsArg::Override => DefaultsMode::Override,
            DefaultsArg::Backfill => DefaultsMode::Backfill,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn arguments_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn convert_flags_become_options() {
        let cli = Cli::try_parse_from([
            "emx",
            "convert",
            "bird.yaml",
            "observation.yaml",
            "--format",
            "CSV",
            "--priority-name-key",
            "name-nl",
            "--strict",
            "--no-pkg-meta",
        ])
        .unwrap();
        let Command::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        let job = args.job();
        assert_eq!(job.files.len(), 2);
        assert_eq!(job.write.format, OutputFormat::Csv);
        assert_eq!(job.convert.priority_name_key.as_deref(), Some("name-nl"));
        assert_eq!(job.convert.strictness, Strictness::Strict);
        assert!(!job.convert.include_pkg_meta);
        assert!(job.write.include_data);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result = Cli::try_parse_from(["emx", "convert", "bird.yaml", "--format", "ods"]);
        assert!(result.is_err());
    }

    #[test]
    fn remap_defaults_to_override_and_model_package() {
        let cli = Cli::try_parse_from(["emx", "remap", "bird.yaml", "--no-data"]).unwrap();
        let Command::Remap(args) = cli.command else {
            panic!("expected remap");
        };
        let job = args.job();
        assert_eq!(job.remap.defaults_mode, DefaultsMode::Override);
        assert!(job.remap.keep_model_package);
        assert!(!job.remap.include_data);
        assert!(job.write.name.is_none());
    }

    #[test]
    fn build_reads_emx_toml_by_default() {
        let cli = Cli::try_parse_from(["emx", "build"]).unwrap();
        let Command::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.config, PathBuf::from("emx.toml"));
    }
}
