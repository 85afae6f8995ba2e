//! Error types for configuration resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or interpreting configuration.
///
/// All of them are fatal: they abort a run before any row is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No layer contributed a column map.
    #[error("column_map is missing after merging layers for '{label}' under {root}")]
    MissingColumnMap { root: PathBuf, label: String },

    /// A fragment file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fragment file is not valid YAML.
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A fragment has the wrong overall shape.
    #[error("{fragment} must be a mapping, found {found}")]
    FragmentShape {
        fragment: &'static str,
        found: &'static str,
    },

    /// Two source columns export to the same target column.
    #[error("target column '{target}' is mapped from both '{first}' and '{second}'")]
    DuplicateTarget {
        target: String,
        first: String,
        second: String,
    },

    /// A value rule could not be interpreted.
    #[error("invalid rule for column '{column}': {message}")]
    InvalidRule { column: String, message: String },

    /// The meta fragment does not match the expected options.
    #[error("invalid meta options: {message}")]
    InvalidMeta { message: String },

    /// A working directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
