//! Format-independent table form and reader dispatch.

use std::collections::HashSet;
use std::path::Path;

use myd_common::string_frame;
use myd_model::SheetSelector;
use polars::prelude::DataFrame;

use crate::csv_table::read_csv_table;
use crate::error::Result;
use crate::excel::{is_workbook, read_excel_table};

/// A parsed table: trimmed headers and rows of nullable cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Converts the table into a frame of nullable string columns.
    pub fn into_frame(self) -> Result<DataFrame> {
        let mut columns: Vec<(String, Vec<Option<String>>)> = self
            .headers
            .into_iter()
            .map(|name| (name, Vec::with_capacity(self.rows.len())))
            .collect();
        for row in self.rows {
            for (column, cell) in columns.iter_mut().zip(row) {
                column.1.push(cell);
            }
        }
        Ok(string_frame(columns)?)
    }
}

/// Reads a workbook (by extension) or a CSV file.
///
/// `delimiter` only applies to CSV and `sheet` only to workbooks.
pub fn read_table(
    path: &Path,
    delimiter: Option<u8>,
    sheet: Option<&SheetSelector>,
) -> Result<RawTable> {
    if is_workbook(path) {
        read_excel_table(path, sheet)
    } else {
        read_csv_table(path, delimiter)
    }
}

/// Trims header names and disambiguates duplicates as `NAME.1`, `NAME.2`, ...
pub(crate) fn unique_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for name in raw {
        let base = name.trim().trim_matches('\u{feff}').to_string();
        let mut candidate = base.clone();
        let mut counter = 1;
        while !seen.insert(candidate.clone()) {
            candidate = format!("{base}.{counter}");
            counter += 1;
        }
        out.push(candidate);
    }
    out
}
