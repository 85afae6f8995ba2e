//! CLI argument definitions for the myd extract transformer.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use myd_report::ReportFormat;

#[derive(Parser)]
#[command(
    name = "myd",
    version,
    about = "Config-driven transformer for master-data extracts",
    long_about = "Map, clean and validate tabular master-data extracts.\n\n\
                  Configuration is layered per object and variant; every run\n\
                  writes an export, a reject file, a text log and optional\n\
                  profiling reports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q to silence progress).
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
    /// Transform one object/variant extract.
    Run(RunArgs),

    /// Check configuration without reading any data.
    Lint(LintArgs),

    /// Run or lint every job in a manifest.
    Batch(BatchArgs),

    /// Create starter configuration files.
    Scaffold(ScaffoldArgs),
}

#[derive(Args, Clone)]
pub struct TargetArgs {
    /// Object (family), e.g. M140. `M140_BNKA` also sets the variant.
    #[arg(short = 'o', long = "object")]
    pub object: Option<String>,

    /// Variant below the object, e.g. BNKA.
    #[arg(short = 'V', long = "variant")]
    pub variant: Option<String>,

    /// Configuration root directory.
    #[arg(short = 'c', long = "config", value_name = "DIR", default_value = "config")]
    pub config: PathBuf,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Input file (overrides meta).
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Export file (overrides meta).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Reject file (overrides meta).
    #[arg(short = 'r', long = "rejects", value_name = "PATH")]
    pub rejects: Option<PathBuf>,

    /// Directory for the text log and reports.
    #[arg(long = "logdir", value_name = "DIR")]
    pub logdir: Option<PathBuf>,

    /// Only process the first N rows; 0 keeps every row.
    #[arg(long = "sample", value_name = "N")]
    pub sample: Option<usize>,

    /// Write profiling reports.
    #[arg(long = "report")]
    pub report: bool,

    #[arg(long = "report-format", value_enum, default_value = "html")]
    pub report_format: ReportFormatArg,

    /// Comma-separated report stages (raw, post, validation).
    #[arg(long = "reports", value_name = "STAGES")]
    pub reports: Option<String>,

    /// Print the configuration layers and files used.
    #[arg(long = "trace-config")]
    pub trace_config: bool,

    /// Do not write the text log.
    #[arg(long = "no-txt-log")]
    pub no_txt_log: bool,

    /// CI preset: quiet, no text log, html reports, strict lint, fail on
    /// rejects and on zero valid rows.
    #[arg(long = "ci")]
    pub ci: bool,

    /// Lint before running and stop on lint errors.
    #[arg(long = "lint")]
    pub lint: bool,

    /// Treat lint warnings as failures.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Exit with status 1 when any row is rejected.
    #[arg(long = "fail-on-rejects")]
    pub fail_on_rejects: bool,

    /// Exit with status 1 when no row is valid.
    #[arg(long = "fail-on-zero-valid")]
    pub fail_on_zero_valid: bool,

    /// Do not add lineage columns.
    #[arg(long = "no-lineage")]
    pub no_lineage: bool,

    /// Keep lineage columns in the export.
    #[arg(long = "keep-lineage")]
    pub keep_lineage: bool,

    /// Encoding for the export (overrides meta).
    #[arg(long = "encoding-out", value_name = "LABEL")]
    pub encoding_out: Option<String>,

    /// Encoding for the reject file (overrides meta).
    #[arg(long = "encoding-rejects", value_name = "LABEL")]
    pub encoding_rejects: Option<String>,

    /// Print the run outcome as JSON instead of the summary table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct LintArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Lint every object and variant under the configuration root.
    #[arg(long = "all")]
    pub all: bool,

    /// Treat warnings as failures.
    #[arg(long = "strict")]
    pub strict: bool,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Manifest with a `jobs` list.
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Configuration root directory.
    #[arg(short = 'c', long = "config", value_name = "DIR", default_value = "config")]
    pub config: PathBuf,

    /// Lint the jobs instead of running them.
    #[arg(long = "lint")]
    pub lint: bool,

    /// Treat lint warnings as failures.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Default row sample for jobs without one.
    #[arg(long = "sample", value_name = "N")]
    pub sample: Option<usize>,

    #[arg(long = "report")]
    pub report: bool,

    #[arg(long = "report-format", value_enum, default_value = "html")]
    pub report_format: ReportFormatArg,

    #[arg(long = "trace-config")]
    pub trace_config: bool,

    #[arg(long = "no-txt-log")]
    pub no_txt_log: bool,

    #[arg(long = "fail-on-rejects")]
    pub fail_on_rejects: bool,

    #[arg(long = "fail-on-zero-valid")]
    pub fail_on_zero_valid: bool,
}

#[derive(Args)]
pub struct ScaffoldArgs {
    /// Target name: `M140_BNKA`, `M140/BNKA` or `M140`.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Configuration root directory.
    #[arg(short = 'c', long = "config", value_name = "DIR", default_value = "config")]
    pub config: PathBuf,

    /// Seed the column map from the header row of this CSV or workbook.
    #[arg(long = "from", visible_aliases = ["from-csv", "from-excel"], value_name = "PATH")]
    pub from: Option<PathBuf>,

    /// Worksheet to read from a workbook: a name or a zero-based position.
    #[arg(long = "sheet", value_name = "SHEET", requires = "from")]
    pub sheet: Option<String>,

    /// Overwrite existing files.
    #[arg(long = "force")]
    pub force: bool,

    /// Show what would be written.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Md,
    Html,
    Both,
}

impl From<ReportFormatArg> for ReportFormat {
    fn from(value: ReportFormatArg) -> Self {
        match value {
            ReportFormatArg::Md => Self::Markdown,
            ReportFormatArg::Html => Self::Html,
            ReportFormatArg::Both => Self::Both,
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
