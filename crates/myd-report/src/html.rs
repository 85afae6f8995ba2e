//! Self-contained HTML rendering of a stage report.

use crate::markdown::shorten;
use crate::stage::StageReport;

const MAX_VALUE_CHARS: usize = 120;

const STYLE: &str = "<style>body{font-family:system-ui,Segoe UI,Arial,sans-serif;margin:24px}\
h1{font-size:20px;margin-bottom:4px}h2{font-size:16px;margin-top:18px}\
.meta{color:#666;margin-bottom:12px}table{border-collapse:collapse;margin:6px 0 16px 0;width:640px}\
th,td{border:1px solid #ddd;padding:6px 8px;font-size:13px}th{background:#f6f6f6;text-align:left}\
code{background:#f3f3f3;padding:1px 4px;border-radius:4px}</style>";

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn render_html(report: &StageReport) -> String {
    let label = escape(&report.label);
    let stage = report.stage.as_str();
    let mut html = vec![
        format!(
            "<!doctype html><html><head><meta charset='utf-8'><title>{label} {stage}</title>{STYLE}</head><body>"
        ),
        format!("<h1>Data Report – {label} ({stage})</h1>"),
        format!(
            "<div class='meta'>Generated: {} &nbsp;|&nbsp; Rows: <b>{}</b></div>",
            escape(&report.generated),
            report.rows
        ),
    ];
    for column in &report.columns {
        html.push(format!("<h2>{}</h2><table>", escape(&column.name)));
        html.push("<tr><th>Metric</th><th>Value</th></tr>".to_string());
        html.push(format!(
            "<tr><td>non-null</td><td>{} / {}</td></tr>",
            column.non_null, column.total
        ));
        html.push(format!("<tr><td>null</td><td>{}</td></tr>", column.null));
        html.push(format!(
            "<tr><td>empty (after strip)</td><td>{}</td></tr>",
            column.blank
        ));
        html.push(format!("<tr><td>unique</td><td>{}</td></tr>", column.unique));
        html.push(format!(
            "<tr><td>len(min/max)</td><td>{} / {}</td></tr>",
            column.min_len, column.max_len
        ));
        if !column.top.is_empty() {
            html.push("<tr><th colspan='2'>top values</th></tr>".to_string());
            for (value, count) in &column.top {
                html.push(format!(
                    "<tr><td><code>{}</code></td><td>{count}</td></tr>",
                    escape(&shorten(value, MAX_VALUE_CHARS))
                ));
            }
        }
        html.push("</table>".to_string());
    }
    if let Some(delta) = report.delta.as_ref().filter(|d| !d.is_empty()) {
        html.push("<h3>Delta vs raw</h3>".to_string());
        html.push("<table><tr><th>column</th><th>changed</th><th>unchanged</th></tr>".to_string());
        for column in delta {
            html.push(format!(
                "<tr><td><code>{}</code></td><td>{}</td><td>{}</td></tr>",
                escape(&column.name),
                column.changed,
                column.unchanged
            ));
        }
        html.push("</table>".to_string());
    }
    html.push("</body></html>".to_string());
    html.concat()
}
