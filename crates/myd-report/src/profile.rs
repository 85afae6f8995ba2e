//! Per-column profiling and the raw/post delta.

use std::collections::{HashMap, HashSet};

use myd_common::{column_names, has_column, optional_values};
use polars::prelude::DataFrame;

use crate::error::Result;

/// Number of most frequent values kept per column.
pub const TOP_VALUES: usize = 5;

/// How a null cell is shown among the top values.
pub const NULL_LABEL: &str = "(null)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProfile {
    pub name: String,
    pub total: usize,
    pub non_null: usize,
    pub null: usize,
    /// Null or blank after trimming.
    pub blank: usize,
    /// Distinct non-null values.
    pub unique: usize,
    pub min_len: usize,
    pub max_len: usize,
    /// Most frequent values, count descending then value ascending.
    pub top: Vec<(String, usize)>,
}

impl ColumnProfile {
    pub fn from_values(name: &str, values: &[Option<String>]) -> Self {
        let non_null = values.iter().filter(|v| v.is_some()).count();
        let blank = values
            .iter()
            .filter(|v| v.as_deref().is_none_or(|s| s.trim().is_empty()))
            .count();
        let unique = values
            .iter()
            .filter_map(Option::as_deref)
            .collect::<HashSet<_>>()
            .len();
        let lengths = values
            .iter()
            .map(|v| v.as_deref().map_or(0, |s| s.chars().count()));
        let min_len = lengths.clone().min().unwrap_or(0);
        let max_len = lengths.max().unwrap_or(0);

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for value in values {
            *counts.entry(value.as_deref().unwrap_or(NULL_LABEL)).or_default() += 1;
        }
        let mut top: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(value, count)| (value.to_string(), count))
            .collect();
        top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top.truncate(TOP_VALUES);

        Self {
            name: name.to_string(),
            total: values.len(),
            non_null,
            null: values.len() - non_null,
            blank,
            unique,
            min_len,
            max_len,
            top,
        }
    }
}

/// Profiles every column: `preferred` columns present in the frame first,
/// then the remaining ones in frame order.
pub fn profile_frame(df: &DataFrame, preferred: &[String]) -> Result<Vec<ColumnProfile>> {
    let mut ordered: Vec<String> = preferred
        .iter()
        .filter(|name| has_column(df, name))
        .cloned()
        .collect();
    for name in column_names(df) {
        if !preferred.contains(&name) {
            ordered.push(name);
        }
    }
    ordered
        .iter()
        .map(|name| -> Result<ColumnProfile> {
            Ok(ColumnProfile::from_values(name, &optional_values(df, name)?))
        })
        .collect()
}

/// Changed and unchanged cell counts for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDelta {
    pub name: String,
    pub changed: usize,
    pub unchanged: usize,
}

/// Compares `current` with `baseline` position by position for each column
/// they share, in `current` order. Two nulls count as unchanged.
pub fn frame_delta(baseline: &DataFrame, current: &DataFrame) -> Result<Vec<ColumnDelta>> {
    let mut deltas = Vec::new();
    for name in column_names(current) {
        if !has_column(baseline, &name) {
            continue;
        }
        let before = optional_values(baseline, &name)?;
        let after = optional_values(current, &name)?;
        let unchanged = before
            .iter()
            .zip(after.iter())
            .filter(|(a, b)| a == b)
            .count();
        deltas.push(ColumnDelta {
            changed: after.len() - unchanged,
            unchanged,
            name,
        });
    }
    Ok(deltas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use myd_common::string_frame;

    fn values(items: &[Option<&str>]) -> Vec<Option<String>> {
        items.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn profile_counts() {
        let profile = ColumnProfile::from_values(
            "A",
            &values(&[Some("x"), Some("x"), Some(" "), None, Some("yyy")]),
        );
        assert_eq!(profile.total, 5);
        assert_eq!(profile.non_null, 4);
        assert_eq!(profile.null, 1);
        assert_eq!(profile.blank, 2);
        assert_eq!(profile.unique, 3);
        assert_eq!((profile.min_len, profile.max_len), (0, 3));
        assert_eq!(
            profile.top,
            vec![
                ("x".to_string(), 2),
                (" ".to_string(), 1),
                (NULL_LABEL.to_string(), 1),
                ("yyy".to_string(), 1),
            ]
        );
    }

    #[test]
    fn preferred_columns_first() {
        let df = string_frame(vec![
            ("B".to_string(), values(&[Some("1")])),
            ("A".to_string(), values(&[Some("2")])),
        ])
        .unwrap();
        let names: Vec<String> = profile_frame(&df, &["A".to_string(), "Z".to_string()])
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn delta_counts_changes() {
        let raw = string_frame(vec![
            ("A".to_string(), values(&[Some(" a"), None, Some("c")])),
            ("B".to_string(), values(&[Some("1"), Some("2"), Some("3")])),
        ])
        .unwrap();
        let post = string_frame(vec![
            ("A".to_string(), values(&[Some("A"), None, Some("c")])),
            ("NEW".to_string(), values(&[Some(""), Some(""), Some("")])),
        ])
        .unwrap();
        assert_eq!(
            frame_delta(&raw, &post).unwrap(),
            vec![ColumnDelta {
                name: "A".to_string(),
                changed: 1,
                unchanged: 2,
            }]
        );
    }
}
