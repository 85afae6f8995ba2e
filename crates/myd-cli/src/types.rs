//! Run options, outcomes and the exit policy.

use std::path::PathBuf;

use myd_config::{ObjectVariant, PathOverrides};
use myd_model::RunCounts;
use myd_report::ReportFormat;
use serde::Serialize;

/// Everything a single pipeline run needs besides configuration files.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config_root: PathBuf,
    pub target: ObjectVariant,
    pub overrides: PathOverrides,
    /// Keep only the first N rows after loading.
    pub sample: Option<usize>,
    pub report: bool,
    pub report_format: ReportFormat,
    /// Stage names from the command line; falls back to `meta.reports.stages`.
    pub stages: Option<Vec<String>>,
    pub trace_config: bool,
    pub txt_log: bool,
    /// Suppress progress lines on stdout.
    pub quiet: bool,
    pub lineage: bool,
    pub keep_lineage: bool,
    pub encoding_out: Option<String>,
    pub encoding_rejects: Option<String>,
}

impl RunOptions {
    pub fn new(config_root: impl Into<PathBuf>, target: ObjectVariant) -> Self {
        Self {
            config_root: config_root.into(),
            target,
            overrides: PathOverrides::default(),
            sample: None,
            report: false,
            report_format: ReportFormat::Html,
            stages: None,
            trace_config: false,
            txt_log: true,
            quiet: false,
            lineage: true,
            keep_lineage: false,
            encoding_out: None,
            encoding_rejects: None,
        }
    }
}

/// `md`, `html` or `both`.
pub fn parse_report_format(name: &str) -> Option<ReportFormat> {
    match name.trim().to_ascii_lowercase().as_str() {
        "md" | "markdown" => Some(ReportFormat::Markdown),
        "html" => Some(ReportFormat::Html),
        "both" => Some(ReportFormat::Both),
        _ => None,
    }
}

/// What a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub label: String,
    pub run_id: String,
    #[serde(flatten)]
    pub counts: RunCounts,
    pub input: PathBuf,
    pub output: PathBuf,
    pub rejects: PathBuf,
    pub txt_log: Option<PathBuf>,
    pub reports: Vec<PathBuf>,
    pub reject_reasons: Option<PathBuf>,
}

/// Maps run counts to a process exit code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExitPolicy {
    pub fail_on_rejects: bool,
    pub fail_on_zero_valid: bool,
}

impl ExitPolicy {
    pub fn exit_code(self, counts: &RunCounts) -> i32 {
        let rejects = self.fail_on_rejects && counts.rejected > 0;
        let zero_valid = self.fail_on_zero_valid && counts.valid == 0;
        i32::from(rejects || zero_valid)
    }
}
