//! Error types for writing artifacts.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// The encoding label is not known.
    #[error("unknown encoding '{label}'")]
    UnknownEncoding { label: String },

    /// Text contains characters the target encoding cannot represent.
    #[error("{path}: text cannot be encoded as {encoding}")]
    Unmappable { encoding: String, path: PathBuf },

    /// Two column_map entries map to the same export column.
    #[error("duplicate export column '{column}' in column_map")]
    DuplicateTarget { column: String },

    /// Failed to create an output directory.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an artifact.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization failed.
    #[error("CSV serialization failed: {message}")]
    Csv { message: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for ReportError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
