//! Export and reject frames and their CSV form.

use std::collections::HashSet;
use std::path::Path;

use myd_common::{column_names, has_column, optional_values, string_frame};
use myd_model::{ColumnMap, ERRORS, LINEAGE};
use polars::prelude::DataFrame;
use tracing::debug;

use crate::encoding::{TextEncoding, write_text};
use crate::error::{ReportError, Result};

type NamedValues = Vec<(String, Vec<Option<String>>)>;

fn mapped_columns(df: &DataFrame, column_map: &ColumnMap) -> Result<NamedValues> {
    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(column_map.len());
    for (source, target) in column_map {
        if !seen.insert(target.as_str()) {
            return Err(ReportError::DuplicateTarget {
                column: target.clone(),
            });
        }
        let values = if has_column(df, source) {
            optional_values(df, source)?
        } else {
            vec![None; df.height()]
        };
        columns.push((target.clone(), values));
    }
    Ok(columns)
}

fn push_lineage(df: &DataFrame, columns: &mut NamedValues) -> Result<()> {
    for name in LINEAGE {
        if has_column(df, name) {
            columns.push(((*name).to_string(), optional_values(df, name)?));
        }
    }
    Ok(())
}

/// Export shape: `column_map` sources in order, renamed to their targets,
/// followed by the lineage columns when `keep_lineage` is set.
pub fn export_frame(valid: &DataFrame, column_map: &ColumnMap, keep_lineage: bool) -> Result<DataFrame> {
    let mut columns = mapped_columns(valid, column_map)?;
    if keep_lineage {
        push_lineage(valid, &mut columns)?;
    }
    Ok(string_frame(columns)?)
}

/// Reject shape: the export columns, every lineage column present, then
/// `__errors`.
pub fn reject_frame(rejected: &DataFrame, column_map: &ColumnMap) -> Result<DataFrame> {
    let mut columns = mapped_columns(rejected, column_map)?;
    push_lineage(rejected, &mut columns)?;
    let errors = if has_column(rejected, ERRORS) {
        optional_values(rejected, ERRORS)?
    } else {
        vec![None; rejected.height()]
    };
    columns.push((ERRORS.to_string(), errors));
    Ok(string_frame(columns)?)
}

/// Renders a frame as CSV with a header row. Nulls are written empty.
pub fn render_csv(df: &DataFrame) -> Result<String> {
    let names = column_names(df);
    let columns = names
        .iter()
        .map(|name| optional_values(df, name))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&names)?;
    for row in 0..df.height() {
        writer.write_record(
            columns
                .iter()
                .map(|values| values[row].as_deref().unwrap_or("")),
        )?;
    }
    let bytes = writer.into_inner().map_err(|e| ReportError::Csv {
        message: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| ReportError::Csv {
        message: e.to_string(),
    })
}

/// Writes `df` as CSV in `encoding` and returns the number of data rows.
pub fn write_csv(path: &Path, df: &DataFrame, encoding: TextEncoding) -> Result<usize> {
    let text = render_csv(df)?;
    write_text(path, &text, encoding)?;
    debug!(path = %path.display(), rows = df.height(), encoding = %encoding.name(), "wrote CSV");
    Ok(df.height())
}
