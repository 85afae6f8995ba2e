//! Report stages, formats and the stage report model.

use std::fmt;
use std::path::{Path, PathBuf};

use myd_config::TokenSet;
use myd_model::EncodingOptions;
use polars::prelude::DataFrame;
use tracing::info;

use crate::encoding::{TextEncoding, write_text};
use crate::error::Result;
use crate::html::render_html;
use crate::markdown::render_markdown;
use crate::profile::{ColumnDelta, ColumnProfile, frame_delta, profile_frame};

/// Pipeline point at which a profiling report is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// After ingest, lineage and sampling; before value maps.
    Raw,
    /// After value maps and transforms.
    Post,
    /// The valid rows after validation.
    Validation,
}

impl Stage {
    pub const DEFAULT: [Stage; 2] = [Stage::Raw, Stage::Validation];

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "raw" => Some(Self::Raw),
            "post" => Some(Self::Post),
            "validation" => Some(Self::Validation),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Post => "post",
            Self::Validation => "validation",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Html,
    Both,
}

impl ReportFormat {
    pub fn markdown(self) -> bool {
        matches!(self, Self::Markdown | Self::Both)
    }

    pub fn html(self) -> bool {
        matches!(self, Self::Html | Self::Both)
    }
}

/// Profile of one frame at one stage.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub label: String,
    pub stage: Stage,
    pub generated: String,
    pub rows: usize,
    pub columns: Vec<ColumnProfile>,
    /// Present for post reports taken against a raw snapshot.
    pub delta: Option<Vec<ColumnDelta>>,
}

impl StageReport {
    pub fn build(
        df: &DataFrame,
        preferred: &[String],
        label: &str,
        stage: Stage,
        generated: &str,
        baseline: Option<&DataFrame>,
    ) -> Result<Self> {
        Ok(Self {
            label: label.to_string(),
            stage,
            generated: generated.to_string(),
            rows: df.height(),
            columns: profile_frame(df, preferred)?,
            delta: baseline.map(|raw| frame_delta(raw, df)).transpose()?,
        })
    }
}

/// Report file name in `log_dir`.
///
/// The template sees `stage`, `ext` and `EXT` on top of the run tokens; a
/// literal `.EXT` or `.ext` suffix is replaced by the real extension.
pub fn report_path(log_dir: &Path, tokens: &TokenSet, template: &str, stage: Stage, ext: &str) -> PathBuf {
    let expanded = tokens
        .clone()
        .with("stage", stage.as_str())
        .with("ext", ext)
        .with("EXT", ext)
        .expand(template)
        .replace(".EXT", &format!(".{ext}"))
        .replace(".ext", &format!(".{ext}"));
    log_dir.join(expanded)
}

/// Writes the report in the requested formats and returns the paths.
pub fn write_stage_report(
    report: &StageReport,
    format: ReportFormat,
    log_dir: &Path,
    tokens: &TokenSet,
    template: &str,
    encodings: &EncodingOptions,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if format.markdown() {
        let path = report_path(log_dir, tokens, template, report.stage, "md");
        let encoding = TextEncoding::parse(encodings.reports_md())?;
        write_text(&path, &render_markdown(report), encoding)?;
        written.push(path);
    }
    if format.html() {
        let path = report_path(log_dir, tokens, template, report.stage, "html");
        let encoding = TextEncoding::parse(encodings.reports_html())?;
        write_text(&path, &render_html(report), encoding)?;
        written.push(path);
    }
    info!(stage = %report.stage, files = written.len(), "wrote report");
    Ok(written)
}
