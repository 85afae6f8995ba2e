//! Batch manifests: a YAML list of jobs run one after another.
//!
//! ```yaml
//! jobs:
//!   - object: M140
//!     variant: BNKA
//!     sample: 100
//!   - object: M140
//!     variant: ADRC
//!     report_format: both
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use myd_config::ObjectVariant;
use serde::Deserialize;

use crate::types::{RunOptions, parse_report_format};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub jobs: Vec<Job>,
}

/// One manifest entry. Unset fields fall back to the command-line values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Job {
    pub object: Option<String>,
    pub variant: Option<String>,
    pub input_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub reject_file: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub sample: Option<usize>,
    pub report: Option<bool>,
    pub report_format: Option<String>,
    pub quiet: Option<bool>,
}

impl Job {
    pub fn target(&self) -> ObjectVariant {
        ObjectVariant::parse(self.object.as_deref(), self.variant.as_deref())
    }

    /// Options for this job on top of the batch-wide `base`.
    pub fn run_options(&self, base: &RunOptions) -> Result<RunOptions> {
        let mut options = base.clone();
        options.target = self.target();
        if let Some(path) = &self.input_file {
            options.overrides.input = Some(path.clone());
        }
        if let Some(path) = &self.output_file {
            options.overrides.output = Some(path.clone());
        }
        if let Some(path) = &self.reject_file {
            options.overrides.rejects = Some(path.clone());
        }
        if let Some(dir) = &self.log_dir {
            options.overrides.log_dir = Some(dir.clone());
        }
        if self.sample.is_some() {
            options.sample = self.sample;
        }
        if let Some(report) = self.report {
            options.report = report;
        }
        if let Some(name) = &self.report_format {
            options.report_format = match parse_report_format(name) {
                Some(format) => format,
                None => bail!("unknown report_format '{name}' for {}", options.target.label()),
            };
        }
        if let Some(quiet) = self.quiet {
            options.quiet = quiet;
        }
        Ok(options)
    }
}

pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read manifest {}", path.display()))?;
    if text.trim().is_empty() {
        return Ok(Manifest::default());
    }
    serde_yaml::from_str(&text).with_context(|| format!("parse manifest {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use myd_report::ReportFormat;

    #[test]
    fn job_fields_override_base() {
        let manifest: Manifest = serde_yaml::from_str(
            "jobs:\n  - object: M140_BNKA\n    sample: 5\n    report_format: both\n    log_dir: out/logs\n  - object: M140\n    variant: ADRC\n",
        )
        .expect("manifest");
        let mut base = RunOptions::new("config", ObjectVariant::default());
        base.report = true;
        base.sample = Some(50);

        let first = manifest.jobs[0].run_options(&base).expect("options");
        assert_eq!(first.target.label(), "M140_BNKA");
        assert_eq!(first.sample, Some(5));
        assert_eq!(first.report_format, ReportFormat::Both);
        assert_eq!(first.overrides.log_dir, Some(PathBuf::from("out/logs")));

        let second = manifest.jobs[1].run_options(&base).expect("options");
        assert_eq!(second.target.label(), "M140_ADRC");
        assert_eq!(second.sample, Some(50));
        assert!(second.report);
    }

    #[test]
    fn unknown_report_format_is_an_error() {
        let job = Job {
            object: Some("M140".to_string()),
            report_format: Some("pdf".to_string()),
            ..Job::default()
        };
        let base = RunOptions::new("config", ObjectVariant::default());
        assert!(job.run_options(&base).is_err());
    }
}
