//! Error types for rule compilation and partitioning.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidateError {
    /// A `pattern` rule does not compile.
    #[error("invalid pattern for column '{column}': {message}")]
    InvalidPattern { column: String, message: String },

    /// A `custom` rule references an id the registry does not know.
    #[error("unknown validator extension '{id}' for column '{column}'")]
    UnknownValidator { column: String, id: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for ValidateError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ValidateError>;
