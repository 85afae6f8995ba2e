//! The per-run text log.

use std::path::PathBuf;

use myd_model::{RowErrors, RunCounts};

/// Figures for the summary block.
#[derive(Debug, Clone)]
pub struct TextLogSummary {
    pub label: String,
    pub counts: RunCounts,
    pub export: PathBuf,
    pub rejects: PathBuf,
}

/// Summary block, blank line, `# Per-record log`, then one line per input
/// row numbered as a spreadsheet row (index + 2).
pub fn render_text_log(summary: &TextLogSummary, errors: &RowErrors) -> String {
    let counts = summary.counts;
    let mut lines = vec![
        format!("Label             : {}", summary.label),
        format!("Total records     : {:>6}", counts.total),
        format!("Valid records     : {:>6}", counts.valid),
        format!("Rejected records  : {:>6}", counts.rejected),
        String::new(),
        format!("Export  : {} ({} rows)", summary.export.display(), counts.valid),
        format!("Rejects : {} ({} rows)", summary.rejects.display(), counts.rejected),
        String::new(),
        "# Per-record log".to_string(),
    ];
    for row in 0..counts.total {
        let line = match errors.get(row) {
            Some(messages) => format!("Row {}: REJECT – {}", row + 2, messages.join(", ")),
            None => format!("Row {}: OK", row + 2),
        };
        lines.push(line);
    }
    lines.join("\n")
}
