//! Error types for the transform stage.

use thiserror::Error;

/// Errors raised while compiling or running transforms.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A `custom` step references an id the registry does not know.
    #[error("unknown transform extension '{id}' for column '{column}'")]
    UnknownExtension { column: String, id: String },

    /// A `regex_replace` pattern does not compile.
    #[error("invalid regex_replace pattern for column '{column}': {message}")]
    InvalidPattern { column: String, message: String },

    /// A transform extension failed on a value; the run is aborted.
    #[error("transform extension '{id}' failed on column '{column}': {message}")]
    Extension {
        column: String,
        id: String,
        message: String,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
