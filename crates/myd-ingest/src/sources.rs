//! Single and multi-source input assembly.
//!
//! With `meta.sources` empty the input is one CSV or workbook file. Otherwise every
//! source is read, filters are applied to the base source, and joins run in
//! declaration order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use polars::prelude::{
    DataFrame, Expr, IntoLazy, JoinArgs, JoinCoalesce, JoinType, MaintainOrderJoin, NULL, col,
    lit,
};
use tracing::{debug, info};

use myd_common::{column_names, has_column};
use myd_model::{FilterOp, FilterSpec, JoinHow, JoinSpec, MetaOptions, SheetSelector, SourceSpec};

use crate::csv_table::parse_delimiter;
use crate::error::{IngestError, Result};
use crate::table::read_table;

/// The assembled input frame and the file that anchors its ingest time.
#[derive(Debug, Clone)]
pub struct LoadedInput {
    pub frame: DataFrame,
    /// The single input file, or the base source file.
    pub origin: PathBuf,
}

/// Reads one CSV or workbook source. `delimiter` overrides CSV detection;
/// `sheet` picks the worksheet of a workbook.
pub fn read_source(
    path: &Path,
    delimiter: Option<&str>,
    sheet: Option<&SheetSelector>,
) -> Result<DataFrame> {
    let delimiter = delimiter.map(parse_delimiter).transpose()?;
    let table = read_table(path, delimiter, sheet)?;
    debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "source read"
    );
    table.into_frame()
}

/// Loads the pipeline input described by `meta`.
pub fn load_input(meta: &MetaOptions, input: &Path) -> Result<LoadedInput> {
    if meta.sources.is_empty() {
        let frame = read_source(input, meta.delimiter.as_deref(), meta.sheet.as_ref())?;
        info!(path = %input.display(), rows = frame.height(), "input loaded");
        return Ok(LoadedInput {
            frame,
            origin: input.to_path_buf(),
        });
    }
    assemble_sources(meta)
}

/// Reads every declared source, filters the base and applies the joins.
pub fn assemble_sources(meta: &MetaOptions) -> Result<LoadedInput> {
    let mut frames: HashMap<&str, (PathBuf, DataFrame)> = HashMap::new();
    for source in &meta.sources {
        let path = source_path(source)?;
        let delimiter = source.delimiter.as_deref().or(meta.delimiter.as_deref());
        let frame = read_source(&path, delimiter, source.sheet.as_ref())?;
        frames.insert(source.name.as_str(), (path, frame));
    }

    let base_name = meta
        .base
        .as_deref()
        .or_else(|| meta.sources.first().map(|s| s.name.as_str()))
        .unwrap_or_default();
    let (origin, base) = frames
        .get(base_name)
        .cloned()
        .ok_or_else(|| IngestError::UnknownSource {
            name: base_name.to_string(),
        })?;

    let mut frame = apply_filters(&base, &meta.filters, base_name)?;
    for join in &meta.joins {
        let right_name = join.right.as_deref().unwrap_or_default();
        let (_, right) = frames
            .get(right_name)
            .ok_or_else(|| IngestError::UnknownSource {
                name: right_name.to_string(),
            })?;
        frame = join_frames(&frame, right, join, right_name)?;
        debug!(right = %right_name, rows = frame.height(), "join applied");
    }
    info!(
        base = %base_name,
        sources = meta.sources.len(),
        joins = meta.joins.len(),
        rows = frame.height(),
        "sources assembled"
    );
    Ok(LoadedInput { frame, origin })
}

fn source_path(source: &SourceSpec) -> Result<PathBuf> {
    source
        .path
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| IngestError::SourceWithoutPath {
            name: source.name.clone(),
        })
}

/// Keeps the rows matching every filter, in their original order.
pub fn apply_filters(df: &DataFrame, filters: &[FilterSpec], source: &str) -> Result<DataFrame> {
    if filters.is_empty() {
        return Ok(df.clone());
    }
    for filter in filters {
        ensure_column(df, &filter.column, source)?;
    }
    let predicate = filters
        .iter()
        .map(filter_expr)
        .reduce(|acc, expr| acc.and(expr))
        .unwrap_or_else(|| lit(true));
    Ok(df.clone().lazy().filter(predicate).collect()?)
}

/// Trimmed cell text with null read as `""`, compared per the filter op.
fn filter_expr(filter: &FilterSpec) -> Expr {
    let value = col(filter.column.as_str())
        .str()
        .strip_chars(lit(NULL))
        .fill_null(lit(""));
    let expected = filter.value.clone().unwrap_or_default();
    match filter.op {
        FilterOp::Eq => value.eq(lit(expected)),
        FilterOp::Ne => value.neq(lit(expected)),
        FilterOp::Blank => value.eq(lit("")),
        FilterOp::NotBlank => value.neq(lit("")),
        FilterOp::In => any_of(value, &filter.values),
        FilterOp::NotIn => any_of(value, &filter.values).not(),
    }
}

fn any_of(value: Expr, candidates: &[String]) -> Expr {
    candidates.iter().fold(lit(false), |acc, candidate| {
        acc.or(value.clone().eq(lit(candidate.clone())))
    })
}

/// Joins `right` onto `left`.
///
/// Left rows keep their order; a left row matching several right rows is
/// repeated once per match. Null keys never match. Overlapping non-key
/// column names receive the configured suffixes, and right key columns are
/// dropped when the join uses `on`.
pub fn join_frames(
    left: &DataFrame,
    right: &DataFrame,
    spec: &JoinSpec,
    right_name: &str,
) -> Result<DataFrame> {
    let (mut left_keys, mut right_keys) =
        spec.key_columns().ok_or_else(|| IngestError::JoinWithoutKeys {
            right: right_name.to_string(),
        })?;
    if left_keys.len() != right_keys.len() || left_keys.is_empty() {
        return Err(IngestError::JoinKeyMismatch {
            right: right_name.to_string(),
            left_count: left_keys.len(),
            right_count: right_keys.len(),
        });
    }
    for key in &left_keys {
        ensure_column(left, key, "<joined>")?;
    }
    for key in &right_keys {
        ensure_column(right, key, right_name)?;
    }

    let shared_keys = spec.on.is_some();
    let (left_suffix, right_suffix) = spec.suffix_pair();
    let mut left = left.clone();
    let mut right = right.clone();

    // polars only suffixes the right side; a left suffix renames both sides
    // up front.
    if !left_suffix.is_empty() {
        let right_names = column_names(&right);
        let overlap: Vec<String> = column_names(&left)
            .into_iter()
            .filter(|name| right_names.contains(name))
            .filter(|name| !(shared_keys && left_keys.contains(name)))
            .collect();
        for name in &overlap {
            let renamed = format!("{name}{left_suffix}");
            left.rename(name, renamed.as_str().into())?;
            replace_key(&mut left_keys, name, &renamed);
            let renamed = format!("{name}{right_suffix}");
            right.rename(name, renamed.as_str().into())?;
            replace_key(&mut right_keys, name, &renamed);
        }
    }

    let how = match spec.how {
        JoinHow::Left => JoinType::Left,
        JoinHow::Inner => JoinType::Inner,
    };
    let coalesce = if shared_keys {
        JoinCoalesce::CoalesceColumns
    } else {
        JoinCoalesce::KeepColumns
    };
    let mut args = JoinArgs::new(how)
        .with_suffix(Some(right_suffix.as_str().into()))
        .with_coalesce(coalesce);
    args.maintain_order = MaintainOrderJoin::LeftRight;

    let left_on: Vec<Expr> = left_keys.iter().map(|k| col(k.as_str())).collect();
    let right_on: Vec<Expr> = right_keys.iter().map(|k| col(k.as_str())).collect();
    Ok(left
        .lazy()
        .join(right.lazy(), left_on, right_on, args)
        .collect()?)
}

fn replace_key(keys: &mut [String], from: &str, to: &str) {
    for key in keys.iter_mut() {
        if key.as_str() == from {
            *key = to.to_string();
        }
    }
}

fn ensure_column(df: &DataFrame, column: &str, source: &str) -> Result<()> {
    if has_column(df, column) {
        Ok(())
    } else {
        Err(IngestError::ColumnNotFound {
            column: column.to_string(),
            source_name: source.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use myd_common::{string_frame, text_values};
    use myd_model::KeyColumns;

    fn frame(columns: Vec<(&str, Vec<Option<&str>>)>) -> DataFrame {
        string_frame(
            columns
                .into_iter()
                .map(|(name, values)| {
                    (
                        name.to_string(),
                        values.into_iter().map(|v| v.map(str::to_string)).collect(),
                    )
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn filters_combine() {
        let df = frame(vec![
            ("LAND", vec![Some("NL"), Some("DE"), None, Some(" NL ")]),
            ("BANKL", vec![Some("1"), Some("2"), Some("3"), None]),
        ]);
        let filters = vec![
            FilterSpec {
                column: "LAND".to_string(),
                op: FilterOp::Eq,
                value: Some("NL".to_string()),
                values: vec![],
            },
            FilterSpec {
                column: "BANKL".to_string(),
                op: FilterOp::NotBlank,
                ..FilterSpec::default()
            },
        ];
        let out = apply_filters(&df, &filters, "banks").unwrap();
        assert_eq!(text_values(&out, "BANKL"), vec!["1"]);
    }

    #[test]
    fn filter_on_missing_column_fails() {
        let df = frame(vec![("A", vec![Some("1")])]);
        let filters = vec![FilterSpec {
            column: "B".to_string(),
            op: FilterOp::Blank,
            ..FilterSpec::default()
        }];
        assert!(matches!(
            apply_filters(&df, &filters, "s").unwrap_err(),
            IngestError::ColumnNotFound { .. }
        ));
    }

    #[test]
    fn left_join_on_shared_key() {
        let left = frame(vec![
            ("BANKL", vec![Some("1"), Some("2"), None]),
            ("NAME", vec![Some("a"), Some("b"), Some("c")]),
        ]);
        let right = frame(vec![
            ("BANKL", vec![Some("1"), Some("1"), None]),
            ("NAME", vec![Some("x"), Some("y"), Some("z")]),
            ("CITY", vec![Some("Ams"), Some("Rot"), Some("Utr")]),
        ]);
        let spec = JoinSpec {
            right: Some("addr".to_string()),
            on: Some(KeyColumns::One("BANKL".to_string())),
            ..JoinSpec::default()
        };
        let out = join_frames(&left, &right, &spec, "addr").unwrap();
        assert_eq!(column_names(&out), vec!["BANKL", "NAME", "NAME_r", "CITY"]);
        assert_eq!(text_values(&out, "NAME"), vec!["a", "a", "b", "c"]);
        assert_eq!(text_values(&out, "CITY"), vec!["Ams", "Rot", "", ""]);
    }

    #[test]
    fn inner_join_with_distinct_keys() {
        let left = frame(vec![("ID", vec![Some("1"), Some("2")])]);
        let right = frame(vec![
            ("KEY", vec![Some("2")]),
            ("V", vec![Some("two")]),
        ]);
        let spec = JoinSpec {
            how: JoinHow::Inner,
            left_on: Some(KeyColumns::One("ID".to_string())),
            right_on: Some(KeyColumns::Many(vec!["KEY".to_string()])),
            ..JoinSpec::default()
        };
        let out = join_frames(&left, &right, &spec, "r").unwrap();
        assert_eq!(column_names(&out), vec!["ID", "KEY", "V"]);
        assert_eq!(text_values(&out, "V"), vec!["two"]);
    }

    #[test]
    fn not_in_filter_treats_null_as_blank() {
        let df = frame(vec![("LAND", vec![Some("NL"), Some("DE"), None, Some(" BE")])]);
        let filter = FilterSpec {
            column: "LAND".to_string(),
            op: FilterOp::NotIn,
            values: vec!["DE".to_string(), "BE".to_string()],
            ..FilterSpec::default()
        };
        let out = apply_filters(&df, &[filter], "banks").unwrap();
        assert_eq!(text_values(&out, "LAND"), vec!["NL", ""]);
    }

    #[test]
    fn left_suffix_renames_both_sides() {
        let left = frame(vec![
            ("ID", vec![Some("1"), Some("2")]),
            ("NAME", vec![Some("a"), Some("b")]),
        ]);
        let right = frame(vec![("ID", vec![Some("2")]), ("NAME", vec![Some("x")])]);
        let spec = JoinSpec {
            on: Some(KeyColumns::One("ID".to_string())),
            suffixes: Some(("_l".to_string(), "_r".to_string())),
            ..JoinSpec::default()
        };
        let out = join_frames(&left, &right, &spec, "r").unwrap();
        assert_eq!(column_names(&out), vec!["ID", "NAME_l", "NAME_r"]);
        assert_eq!(text_values(&out, "NAME_r"), vec!["", "x"]);
    }

    #[test]
    fn join_without_keys_fails() {
        let df = frame(vec![("A", vec![Some("1")])]);
        let err = join_frames(&df, &df, &JoinSpec::default(), "r").unwrap_err();
        assert!(matches!(err, IngestError::JoinWithoutKeys { .. }));
    }
}
