//! Raw value substitution ahead of the transform chains.

use myd_common::{has_column, set_text_column, text_values};
use myd_model::ValueMap;
use polars::prelude::{DataFrame, PolarsResult};
use tracing::debug;

/// Replaces values per column using the trimmed text as lookup key.
///
/// Unmatched values become their trimmed form and nulls become `""`.
/// Columns missing from the frame are skipped, not created.
pub fn apply_value_map(df: &mut DataFrame, value_map: &ValueMap) -> PolarsResult<()> {
    for (column, mapping) in value_map {
        if !has_column(df, column) {
            debug!(column = %column, "value_map column not in frame");
            continue;
        }
        let mut replaced = 0usize;
        let values: Vec<String> = text_values(df, column)
            .iter()
            .map(|value| {
                let key = value.trim();
                match mapping.get(key) {
                    Some(replacement) => {
                        replaced += 1;
                        replacement.clone()
                    }
                    None => key.to_string(),
                }
            })
            .collect();
        set_text_column(df, column, values)?;
        debug!(column = %column, replaced, "applied value_map");
    }
    Ok(())
}
