//! Reject reason frequencies.

use std::collections::HashMap;
use std::path::Path;

use myd_common::{has_column, text_values};
use myd_model::ERRORS;
use polars::prelude::DataFrame;

use crate::encoding::{TextEncoding, write_text};
use crate::error::{ReportError, Result};

/// Counts each `"; "`-separated message in the `__errors` column, most
/// frequent first, ties by message.
pub fn count_reasons(rejected: &DataFrame) -> Vec<(String, usize)> {
    if !has_column(rejected, ERRORS) {
        return Vec::new();
    }
    let mut counts: HashMap<String, usize> = HashMap::new();
    for errors in text_values(rejected, ERRORS) {
        for reason in errors.split("; ").filter(|r| !r.is_empty()) {
            *counts.entry(reason.to_string()).or_default() += 1;
        }
    }
    let mut reasons: Vec<(String, usize)> = counts.into_iter().collect();
    reasons.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    reasons
}

pub fn render_reasons_csv(reasons: &[(String, usize)]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["reason", "count"])?;
    for (reason, count) in reasons {
        writer.write_record([reason.as_str(), count.to_string().as_str()])?;
    }
    let bytes = writer.into_inner().map_err(|e| ReportError::Csv {
        message: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| ReportError::Csv {
        message: e.to_string(),
    })
}

/// Writes the reasons CSV. Returns false, writing nothing, when there are
/// no reasons.
pub fn write_reject_reasons(path: &Path, rejected: &DataFrame, encoding: TextEncoding) -> Result<bool> {
    let reasons = count_reasons(rejected);
    if reasons.is_empty() {
        return Ok(false);
    }
    write_text(path, &render_reasons_csv(&reasons)?, encoding)?;
    Ok(true)
}
