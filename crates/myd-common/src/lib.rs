//! Shared utilities for myd crates.
//!
//! Every frame handled by the pipeline holds nullable string columns; the
//! helpers here read and write such columns without caring about the dtype
//! polars inferred.

pub mod frame;
pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use crate::frame::{
    column_names, filter_rows, has_column, optional_values, set_optional_column,
    set_text_column, string_frame, text_values,
};
pub use crate::polars::{any_to_optional, any_to_string, format_numeric};
