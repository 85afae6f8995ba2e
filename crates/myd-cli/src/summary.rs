use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};

use myd_cli::types::RunOutcome;

pub fn print_summary(outcome: &RunOutcome) {
    println!("Run: {}", outcome.run_id);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Label"),
        header_cell("Total"),
        header_cell("Valid"),
        header_cell("Rejected"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=3 {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    let counts = outcome.counts;
    table.add_row(vec![
        Cell::new(&outcome.label)
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(counts.total),
        Cell::new(counts.valid).fg(Color::Green),
        count_cell(counts.rejected),
    ]);
    println!("{table}");

    let mut files = Table::new();
    files.set_header(vec![header_cell("Artifact"), header_cell("Path")]);
    apply_table_style(&mut files);
    files.add_row(vec![Cell::new("Export"), Cell::new(outcome.output.display())]);
    files.add_row(vec![Cell::new("Rejects"), Cell::new(outcome.rejects.display())]);
    if let Some(path) = &outcome.txt_log {
        files.add_row(vec![Cell::new("Log"), Cell::new(path.display())]);
    }
    for path in &outcome.reports {
        files.add_row(vec![Cell::new("Report"), Cell::new(path.display())]);
    }
    if let Some(path) = &outcome.reject_reasons {
        files.add_row(vec![Cell::new("Reject reasons"), Cell::new(path.display())]);
    }
    println!("{files}");
}

fn count_cell(count: usize) -> Cell {
    if count == 0 {
        Cell::new(count).fg(Color::DarkGrey)
    } else {
        Cell::new(count).fg(Color::Red).add_attribute(Attribute::Bold)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}
