//! Split a frame into valid and rejected rows.

use myd_common::{filter_rows, set_text_column};
use myd_model::{ERRORS, RowErrors};
use polars::prelude::DataFrame;

use crate::error::Result;

/// Valid and rejected rows with their original positional indices.
#[derive(Debug, Clone)]
pub struct Partition {
    pub valid: DataFrame,
    /// Rejected rows with an `__errors` column appended.
    pub rejected: DataFrame,
    pub valid_rows: Vec<usize>,
    pub rejected_rows: Vec<usize>,
}

impl Partition {
    pub fn valid_count(&self) -> usize {
        self.valid_rows.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected_rows.len()
    }
}

/// Partitions `df` by `errors`. Every row lands on exactly one side and
/// both sides keep frame order.
pub fn partition(df: &DataFrame, errors: &RowErrors) -> Result<Partition> {
    let keep: Vec<bool> = (0..df.height()).map(|row| !errors.is_rejected(row)).collect();
    let drop: Vec<bool> = keep.iter().map(|k| !k).collect();

    let valid_rows: Vec<usize> = (0..df.height()).filter(|row| keep[*row]).collect();
    let rejected_rows: Vec<usize> = (0..df.height()).filter(|row| drop[*row]).collect();

    let valid = filter_rows(df, &keep)?;
    let mut rejected = filter_rows(df, &drop)?;
    let messages: Vec<String> = rejected_rows.iter().map(|row| errors.joined(*row)).collect();
    set_text_column(&mut rejected, ERRORS, messages)?;

    Ok(Partition {
        valid,
        rejected,
        valid_rows,
        rejected_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use myd_common::{column_names, string_frame, text_values};

    #[test]
    fn splits_and_joins_messages() {
        let df = string_frame(vec![(
            "A".to_string(),
            vec![Some("a".to_string()), Some("b".to_string()), Some("c".to_string())],
        )])
        .unwrap();
        let mut errors = RowErrors::new();
        errors.push(1, "A is required");
        errors.push(1, "A longer than 3");

        let parts = partition(&df, &errors).unwrap();
        assert_eq!(parts.valid_rows, vec![0, 2]);
        assert_eq!(parts.rejected_rows, vec![1]);
        assert_eq!(text_values(&parts.valid, "A"), vec!["a", "c"]);
        assert_eq!(column_names(&parts.rejected), vec!["A", ERRORS]);
        assert_eq!(
            text_values(&parts.rejected, ERRORS),
            vec!["A is required; A longer than 3"]
        );
    }

    #[test]
    fn no_errors_means_empty_reject_set() {
        let df = string_frame(vec![("A".to_string(), vec![Some("a".to_string())])]).unwrap();
        let parts = partition(&df, &RowErrors::new()).unwrap();
        assert_eq!(parts.valid_count(), 1);
        assert_eq!(parts.rejected.height(), 0);
        assert_eq!(column_names(&parts.rejected), vec!["A", ERRORS]);
    }
}
