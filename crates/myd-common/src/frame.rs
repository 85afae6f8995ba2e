//! Helpers for frames made of nullable string columns.

use polars::prelude::{
    AnyValue, BooleanChunked, Column, DataFrame, IntoColumn, NamedFrom, NewChunkedArray,
    PolarsResult, Series,
};

use crate::polars::{any_to_optional, any_to_string};

/// Builds a frame from named columns of optional strings.
///
/// All columns must have the same length.
pub fn string_frame(columns: Vec<(String, Vec<Option<String>>)>) -> PolarsResult<DataFrame> {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| Series::new(name.as_str().into(), values).into_column())
        .collect();
    DataFrame::new(cols)
}

/// Column names in frame order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names_owned()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Values of a column with nulls preserved.
pub fn optional_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?;
    Ok((0..df.height())
        .map(|idx| any_to_optional(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect())
}

/// Textual values of a column; null cells and a missing column read as `""`.
pub fn text_values(df: &DataFrame, name: &str) -> Vec<String> {
    match df.column(name) {
        Ok(column) => (0..df.height())
            .map(|idx| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect(),
        Err(_) => vec![String::new(); df.height()],
    }
}

/// Replaces (or appends) a non-null string column.
pub fn set_text_column(df: &mut DataFrame, name: &str, values: Vec<String>) -> PolarsResult<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

/// Replaces (or appends) a nullable string column.
pub fn set_optional_column(
    df: &mut DataFrame,
    name: &str,
    values: Vec<Option<String>>,
) -> PolarsResult<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

/// Keeps the rows whose mask entry is true, preserving order.
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> PolarsResult<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    df.filter(&mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        string_frame(vec![
            (
                "A".to_string(),
                vec![Some("x".to_string()), None, Some(" y ".to_string())],
            ),
            (
                "B".to_string(),
                vec![Some("1".to_string()), Some("2".to_string()), None],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn reads_text_and_optional_values() {
        let df = sample();
        assert_eq!(text_values(&df, "A"), vec!["x", "", " y "]);
        assert_eq!(
            optional_values(&df, "B").unwrap(),
            vec![Some("1".to_string()), Some("2".to_string()), None]
        );
        assert_eq!(text_values(&df, "MISSING"), vec!["", "", ""]);
    }

    #[test]
    fn set_and_filter() {
        let mut df = sample();
        set_text_column(&mut df, "C", vec!["a".into(), "b".into(), "c".into()]).unwrap();
        assert_eq!(column_names(&df), vec!["A", "B", "C"]);
        let kept = filter_rows(&df, &[true, false, true]).unwrap();
        assert_eq!(kept.height(), 2);
        assert_eq!(text_values(&kept, "C"), vec!["a", "c"]);
        assert!(has_column(&kept, "A"));
    }
}
