//! Column rules compiled once and evaluated against every row.

use std::fmt;
use std::sync::Arc;

use myd_common::text_values;
use myd_model::{RowErrors, ValueRules};
use myd_transform::{ExtensionRegistry, ValidatorExtension};
use polars::prelude::DataFrame;
use regex::Regex;
use tracing::debug;

use crate::error::{Result, ValidateError};

/// Checks declared for one column.
#[derive(Clone)]
pub struct ColumnChecks {
    pub column: String,
    required: bool,
    pattern: Option<(String, Regex)>,
    max_length: Option<usize>,
    custom: Option<(String, Arc<dyn ValidatorExtension>)>,
}

impl fmt::Debug for ColumnChecks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnChecks")
            .field("column", &self.column)
            .field("required", &self.required)
            .field("pattern", &self.pattern.as_ref().map(|(p, _)| p))
            .field("max_length", &self.max_length)
            .field("custom", &self.custom.as_ref().map(|(id, _)| id))
            .finish()
    }
}

impl ColumnChecks {
    /// Messages for one value, in check order. No check stops another.
    pub fn check(&self, value: &str) -> Vec<String> {
        let column = &self.column;
        let trimmed = value.trim();
        let mut messages = Vec::new();

        if self.required && trimmed.is_empty() {
            messages.push(format!("{column} is required"));
        }
        if let Some((source, regex)) = &self.pattern
            && !trimmed.is_empty()
            && !regex.is_match(trimmed)
        {
            messages.push(format!("{column} mismatches {source}"));
        }
        if let Some(max) = self.max_length
            && trimmed.chars().count() > max
        {
            messages.push(format!("{column} longer than {max}"));
        }
        if let Some((_, validator)) = &self.custom
            && (self.required || !trimmed.is_empty())
        {
            match validator.check(trimmed) {
                Ok(true) => {}
                Ok(false) => messages.push(format!("{column} custom failed")),
                Err(err) => messages.push(format!("{column} custom error: {err}")),
            }
        }
        messages
    }
}

/// Compiled validation rules in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    columns: Vec<ColumnChecks>,
}

impl RuleSet {
    /// Compiles patterns and resolves validators for every column with at
    /// least one check.
    pub fn compile(rules: &ValueRules, registry: &ExtensionRegistry) -> Result<Self> {
        let mut columns = Vec::new();
        for (column, rule) in rules {
            if !rule.has_checks() {
                continue;
            }
            let pattern = match &rule.pattern {
                Some(source) => {
                    let regex = Regex::new(&format!("^(?:{source})$")).map_err(|e| {
                        ValidateError::InvalidPattern {
                            column: column.clone(),
                            message: e.to_string(),
                        }
                    })?;
                    Some((source.clone(), regex))
                }
                None => None,
            };
            let custom = match &rule.custom {
                Some(reference) => {
                    let validator = registry.validator(reference).ok_or_else(|| {
                        ValidateError::UnknownValidator {
                            column: column.clone(),
                            id: reference.id(),
                        }
                    })?;
                    Some((reference.id(), validator))
                }
                None => None,
            };
            columns.push(ColumnChecks {
                column: column.clone(),
                required: rule.required,
                pattern,
                max_length: rule.max_length,
                custom,
            });
        }
        Ok(Self { columns })
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[ColumnChecks] {
        &self.columns
    }

    /// Evaluates every rule on every row.
    ///
    /// A column missing from the frame reads as all-empty.
    pub fn evaluate(&self, df: &DataFrame) -> RowErrors {
        let mut errors = RowErrors::new();
        for checks in &self.columns {
            let values = text_values(df, &checks.column);
            let mut failed = 0usize;
            for (row, value) in values.iter().enumerate() {
                for message in checks.check(value) {
                    errors.push(row, message);
                    failed += 1;
                }
            }
            debug!(column = %checks.column, failed, "evaluated rules");
        }
        errors
    }
}
