//! Workbook reading through calamine.
//!
//! Every cell is read as text: numbers are rendered without a trailing
//! `.0`, empty cells are null, and the first non-empty row is the header.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tracing::debug;

use myd_common::format_numeric;
use myd_model::SheetSelector;

use crate::error::{IngestError, Result};
use crate::table::{RawTable, unique_headers};

/// File extensions read as workbooks.
pub const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| WORKBOOK_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Reads one worksheet; the first sheet when `sheet` is `None`.
pub fn read_excel_table(path: &Path, sheet: Option<&SheetSelector>) -> Result<RawTable> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let workbook_error = |message: String| IngestError::Workbook {
        path: path.to_path_buf(),
        message,
    };
    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;

    let names = workbook.sheet_names();
    let name = match sheet {
        None => names.first().cloned(),
        Some(SheetSelector::Index(idx)) => names.get(*idx).cloned(),
        Some(SheetSelector::Name(wanted)) => names.iter().find(|n| *n == wanted).cloned(),
    }
    .ok_or_else(|| IngestError::SheetNotFound {
        path: path.to_path_buf(),
        sheet: sheet.map_or_else(|| "#0".to_string(), ToString::to_string),
        available: names.join(", "),
    })?;

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| workbook_error(e.to_string()))?;

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for cells in range.rows() {
        let cells: Vec<Option<String>> = cells.iter().map(cell_text).collect();
        if cells.iter().all(Option::is_none) {
            continue;
        }
        match &headers {
            None => {
                let raw: Vec<String> = cells.into_iter().map(Option::unwrap_or_default).collect();
                headers = Some(unique_headers(raw.iter().map(String::as_str)));
            }
            Some(names) => {
                let mut row = cells;
                row.resize(names.len(), None);
                rows.push(row);
            }
        }
    }
    debug!(path = %path.display(), sheet = %name, rows = rows.len(), "worksheet read");
    Ok(RawTable {
        headers: headers.unwrap_or_default(),
        rows,
    })
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(text) if text.is_empty() => None,
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => Some(text.clone()),
        Data::Float(value) => Some(format_numeric(*value)),
        Data::Int(value) => Some(value.to_string()),
        Data::Bool(value) => Some(value.to_string()),
        other => Some(other.to_string()),
    }
}
