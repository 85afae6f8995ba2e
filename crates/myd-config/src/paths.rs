//! Working directories and artifact paths of a run.

use std::path::{Path, PathBuf};

use myd_model::MetaOptions;

use crate::error::{ConfigError, Result};
use crate::naming::TokenSet;

/// Input file name used when nothing else names one.
pub const DEFAULT_INPUT: &str = "bank_raw.csv";

/// Default directory for logs and reports.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Paths given explicitly on the command line or in a batch job.
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub rejects: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub raw_dir: PathBuf,
    pub out_dir: PathBuf,
    pub rejects_dir: PathBuf,
    pub log_dir: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub rejects: PathBuf,
}

impl ArtifactPaths {
    /// Resolves every path; nothing is created on disk.
    pub fn resolve(meta: &MetaOptions, tokens: &TokenSet, overrides: &PathOverrides) -> Self {
        let raw_dir = PathBuf::from(&meta.dirs.raw);
        let out_dir = PathBuf::from(&meta.dirs.out);
        let rejects_dir = PathBuf::from(&meta.dirs.rejects);

        let input = match (&overrides.input, &meta.input_file, &meta.naming.input) {
            (Some(path), _, _) => path.clone(),
            (None, Some(file), _) => join_if_relative(&raw_dir, &tokens.expand(file)),
            (None, None, Some(pattern)) => raw_dir.join(tokens.expand(pattern)),
            (None, None, None) => raw_dir.join(DEFAULT_INPUT),
        };
        let output = match (&overrides.output, &meta.output_file) {
            (Some(path), _) => path.clone(),
            (None, Some(file)) => join_if_relative(&out_dir, &tokens.expand(file)),
            (None, None) => out_dir.join(tokens.expand(meta.naming.output_pattern())),
        };
        let rejects = match (&overrides.rejects, &meta.reject_file) {
            (Some(path), _) => path.clone(),
            (None, Some(file)) => join_if_relative(&rejects_dir, &tokens.expand(file)),
            (None, None) => rejects_dir.join(tokens.expand(meta.naming.rejects_pattern())),
        };
        let log_dir = overrides
            .log_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));

        Self {
            raw_dir,
            out_dir,
            rejects_dir,
            log_dir,
            input,
            output,
            rejects,
        }
    }

    /// Creates the working directories and the parents of written files.
    pub fn create_dirs(&self) -> Result<()> {
        let parents = [self.output.parent(), self.rejects.parent()];
        let dirs = [
            Some(self.raw_dir.as_path()),
            Some(self.out_dir.as_path()),
            Some(self.rejects_dir.as_path()),
            Some(self.log_dir.as_path()),
        ];
        for dir in dirs.into_iter().chain(parents).flatten() {
            if dir.as_os_str().is_empty() {
                continue;
            }
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }
}

fn join_if_relative(base: &Path, path: &str) -> PathBuf {
    let candidate = PathBuf::from(path);
    if candidate.is_absolute() {
        candidate
    } else {
        base.join(candidate)
    }
}
