//! Validation of transformed rows.
//!
//! [`RuleSet::compile`] turns `value_rules` into checks once per run;
//! [`RuleSet::evaluate`] records every violation per row without short
//! circuiting, and [`partition`] splits the frame into valid and rejected
//! rows.

pub mod engine;
pub mod error;
pub mod partition;

pub use engine::{ColumnChecks, RuleSet};
pub use error::{Result, ValidateError};
pub use partition::{Partition, partition};

use myd_model::ValueRules;
use myd_transform::ExtensionRegistry;
use polars::prelude::DataFrame;

/// Compiles `rules`, evaluates them against `df` and partitions the rows.
pub fn validate_frame(
    df: &DataFrame,
    rules: &ValueRules,
    registry: &ExtensionRegistry,
) -> Result<Partition> {
    let rule_set = RuleSet::compile(rules, registry)?;
    let errors = rule_set.evaluate(df);
    partition(df, &errors)
}
