//! Error types for source ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading and assembling sources.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Source file not found.
    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Malformed CSV content.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Delimiter setting is not a single ASCII character.
    #[error("invalid delimiter '{value}': expected a single ASCII character")]
    InvalidDelimiter { value: String },

    // === Workbook Errors ===
    /// Workbook could not be opened or a sheet could not be read.
    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    /// Requested worksheet does not exist.
    #[error("sheet '{sheet}' not found in {path} (available: {available})")]
    SheetNotFound {
        path: PathBuf,
        sheet: String,
        available: String,
    },

    // === Assembly Errors ===
    /// A source declared in meta has no path.
    #[error("source '{name}' has no path")]
    SourceWithoutPath { name: String },

    /// A join or base references a source that was not declared.
    #[error("unknown source '{name}'")]
    UnknownSource { name: String },

    /// A join declares neither `on` nor `left_on`/`right_on`.
    #[error("join with '{right}' declares no key columns")]
    JoinWithoutKeys { right: String },

    /// Left and right key lists differ in length.
    #[error("join with '{right}' has {left_count} left keys but {right_count} right keys")]
    JoinKeyMismatch {
        right: String,
        left_count: usize,
        right_count: usize,
    },

    /// Column referenced by a filter or join is missing.
    #[error("column '{column}' not found in source '{source_name}'")]
    ColumnNotFound { column: String, source_name: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/raw/bank_raw.csv"),
        };
        assert_eq!(err.to_string(), "source file not found: /data/raw/bank_raw.csv");
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
