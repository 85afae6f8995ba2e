//! Starter configuration for a new object or variant.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use myd_ingest::{is_workbook, read_table};
use myd_model::SheetSelector;
use tracing::warn;

/// Files to create for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldPlan {
    pub base: PathBuf,
    pub files: Vec<(PathBuf, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaffoldAction {
    Write(PathBuf),
    Skip(PathBuf),
}

impl fmt::Display for ScaffoldAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write(path) => write!(f, "  write {}", path.display()),
            Self::Skip(path) => write!(f, "  skip  {} (exists)", path.display()),
        }
    }
}

/// Plans the four fragments for `name` (`M140_BNKA`, `M140/BNKA` or `M140`).
///
/// With `header_source` (a CSV or workbook), the column map lists that file's
/// header columns as identity mappings; an unreadable file falls back to the
/// commented template. A workbook source also points `meta.yaml` at an
/// `.xlsx` input and records `sheet`.
pub fn plan_scaffold(
    root: &Path,
    name: &str,
    header_source: Option<&Path>,
    sheet: Option<&SheetSelector>,
) -> Result<ScaffoldPlan> {
    let normalized = name.replace('/', "_");
    let normalized = normalized.trim_matches('_');
    if normalized.is_empty() {
        bail!("scaffold name is empty");
    }
    let parts: Vec<&str> = normalized.split('_').filter(|p| !p.is_empty()).collect();
    let (base, stem) = match parts.as_slice() {
        [object, variant] => (root.join(object).join(variant), format!("{object}_{variant}")),
        _ => (root.join(normalized), normalized.to_string()),
    };

    let headers = match header_source {
        Some(path) => match read_table(path, None, sheet) {
            Ok(table) => Some(table.headers),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot read header source, using template");
                None
            }
        },
        None => None,
    };
    let workbook = header_source
        .filter(|path| is_workbook(path))
        .map(|_| sheet);

    let files = vec![
        (base.join("column_map.yaml"), column_map_text(headers.as_deref())),
        (base.join("value_map.yaml"), "{}\n".to_string()),
        (base.join("value_rules.yaml"), VALUE_RULES_TEMPLATE.to_string()),
        (base.join("meta.yaml"), meta_text(&stem, workbook)),
    ];
    Ok(ScaffoldPlan { base, files })
}

/// Writes the planned files. Existing files are kept unless `force`;
/// `dry_run` reports the actions without touching the disk.
pub fn apply_scaffold(plan: &ScaffoldPlan, force: bool, dry_run: bool) -> Result<Vec<ScaffoldAction>> {
    let mut actions = Vec::new();
    for (path, contents) in &plan.files {
        if path.exists() && !force {
            actions.push(ScaffoldAction::Skip(path.clone()));
            continue;
        }
        if !dry_run {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            std::fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;
        }
        actions.push(ScaffoldAction::Write(path.clone()));
    }
    Ok(actions)
}

const VALUE_RULES_TEMPLATE: &str = "\
# value_rules.yaml
# ORT01:
#   pattern: '^[A-Za-z .-]+$'
# SWIFT:
#   transforms: [strip, upper]
#   max_length: 11
";

fn column_map_text(headers: Option<&[String]>) -> String {
    let mut out = String::from("# column_map.yaml\n");
    match headers {
        Some(headers) if !headers.is_empty() => {
            for header in headers {
                let quoted = yaml_quote(header);
                out.push_str(&format!("{quoted}: {quoted}\n"));
            }
        }
        _ => out.push_str("# SOURCE1: \"TARGET1\"\n# SOURCE2: \"TARGET2\"\n"),
    }
    out
}

/// `workbook` is `Some` when the header source was a workbook, carrying its sheet.
fn meta_text(stem: &str, workbook: Option<Option<&SheetSelector>>) -> String {
    let extension = if workbook.is_some() { "xlsx" } else { "csv" };
    let mut out = format!(
        "# meta.yaml\ninput_file: {}\noutput_file: {}\nreject_file: {}\n",
        yaml_quote(&format!("{stem}_raw.{extension}")),
        yaml_quote(&format!("S_{stem}#FreeText_Mandatory.csv")),
        yaml_quote(&format!("{}_rejected.csv", stem.to_lowercase())),
    );
    match workbook.flatten() {
        Some(SheetSelector::Index(idx)) => out.push_str(&format!("sheet: {idx}\n")),
        Some(SheetSelector::Name(name)) => out.push_str(&format!("sheet: {}\n", yaml_quote(name))),
        None => {}
    }
    out
}

fn yaml_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
