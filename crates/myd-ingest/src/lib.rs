//! Source ingestion for myd.
//!
//! Reads delimited text and workbooks into frames of nullable string columns
//! and assembles multi-source inputs through filters and joins.

pub mod csv_table;
pub mod error;
pub mod excel;
pub mod sources;
pub mod table;

pub use csv_table::{
    decode_bytes, detect_delimiter, parse_csv_text, parse_delimiter, read_csv_table,
};
pub use error::{IngestError, Result};
pub use excel::{WORKBOOK_EXTENSIONS, is_workbook, read_excel_table};
pub use sources::{LoadedInput, apply_filters, assemble_sources, join_frames, load_input, read_source};
pub use table::{RawTable, read_table};
