//! Markdown rendering of a stage report.

use crate::profile::{ColumnDelta, ColumnProfile};
use crate::stage::StageReport;

const MAX_VALUE_CHARS: usize = 80;

pub(crate) fn shorten(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let head: String = value.chars().take(max - 3).collect();
        format!("{head}...")
    }
}

pub fn render_markdown(report: &StageReport) -> String {
    let mut lines = vec![
        format!("# Data Report – {} ({})", report.label, report.stage),
        format!("_Generated: {}_", report.generated),
        String::new(),
        format!("Total rows: **{}**", report.rows),
        String::new(),
    ];
    for column in &report.columns {
        column_lines(column, &mut lines);
    }
    if let Some(delta) = &report.delta {
        delta_lines(delta, &mut lines);
    }
    lines.join("\n")
}

fn column_lines(column: &ColumnProfile, lines: &mut Vec<String>) {
    lines.push(format!("## {}", column.name));
    lines.push(format!(
        "- non-null: **{}** / {}  |  null: **{}**  |  empty (after strip): **{}**",
        column.non_null, column.total, column.null, column.blank
    ));
    lines.push(format!(
        "- unique: **{}**  |  len(min/max): **{} / {}**",
        column.unique, column.min_len, column.max_len
    ));
    if !column.top.is_empty() {
        lines.push(String::new());
        lines.push("| value | count |".to_string());
        lines.push("|---|---:|".to_string());
        for (value, count) in &column.top {
            lines.push(format!(
                "| `{}` | {count} |",
                shorten(value, MAX_VALUE_CHARS).replace('|', "\\|")
            ));
        }
    }
    lines.push(String::new());
}

fn delta_lines(delta: &[ColumnDelta], lines: &mut Vec<String>) {
    lines.push(String::new());
    lines.push("### Delta vs raw".to_string());
    lines.push(String::new());
    lines.push("| column | changed | unchanged |".to_string());
    lines.push("|---|---:|---:|".to_string());
    for column in delta {
        lines.push(format!(
            "| {} | {} | {} |",
            column.name, column.changed, column.unchanged
        ));
    }
}
