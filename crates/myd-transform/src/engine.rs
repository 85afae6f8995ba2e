//! Per-column transform chains.

use myd_common::{has_column, set_text_column, text_values};
use myd_model::ValueRules;
use polars::prelude::{DataFrame, PolarsResult};
use tracing::debug;

use crate::error::Result;
use crate::registry::ExtensionRegistry;
use crate::steps::CompiledStep;

/// The transform chains of a rule set, compiled once per run.
#[derive(Debug, Clone, Default)]
pub struct TransformPlan {
    columns: Vec<(String, Vec<CompiledStep>)>,
}

impl TransformPlan {
    /// Compiles every non-empty chain.
    ///
    /// Fails on the first invalid pattern or unknown extension id, before
    /// any value is touched.
    pub fn compile(rules: &ValueRules, registry: &ExtensionRegistry) -> Result<Self> {
        let mut columns = Vec::new();
        for (column, rule) in rules {
            if !rule.has_transforms() {
                continue;
            }
            let steps = rule
                .transforms
                .iter()
                .map(|step| CompiledStep::compile(column, step, registry))
                .collect::<Result<Vec<_>>>()?;
            columns.push((column.clone(), steps));
        }
        Ok(Self { columns })
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns with a chain, in rule order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Runs every chain. A column absent from the frame is created empty;
    /// nulls read as `""`.
    pub fn apply(&self, df: &mut DataFrame) -> Result<()> {
        for (column, steps) in &self.columns {
            let mut values = text_values(df, column);
            for step in steps {
                values = values
                    .iter()
                    .map(|value| step.apply(column, value))
                    .collect::<Result<Vec<_>>>()?;
            }
            debug!(column = %column, steps = ?steps, "applied transforms");
            set_text_column(df, column, values)?;
        }
        Ok(())
    }
}

/// Appends every missing column as an all-empty text column.
pub fn ensure_columns<'a>(
    df: &mut DataFrame,
    names: impl IntoIterator<Item = &'a str>,
) -> PolarsResult<()> {
    for name in names {
        if !has_column(df, name) {
            debug!(column = %name, "creating missing column");
            set_text_column(df, name, vec![String::new(); df.height()])?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use myd_common::{column_names, string_frame};
    use myd_model::{ExtensionRef, TransformStep, ValueRule};

    use crate::error::TransformError;
    use crate::registry::ExtensionError;

    fn frame(values: &[Option<&str>]) -> DataFrame {
        string_frame(vec![(
            "SWIFT".to_string(),
            values.iter().map(|v| v.map(str::to_string)).collect(),
        )])
        .unwrap()
    }

    fn rules(column: &str, steps: Vec<TransformStep>) -> ValueRules {
        let mut rules = ValueRules::new();
        rules.insert(
            column.to_string(),
            ValueRule {
                transforms: steps,
                ..ValueRule::default()
            },
        );
        rules
    }

    #[test]
    fn strip_then_upper() {
        let mut df = frame(&[Some("  abc "), None]);
        let plan = TransformPlan::compile(
            &rules("SWIFT", vec![TransformStep::Strip, TransformStep::Upper]),
            &ExtensionRegistry::new(),
        )
        .unwrap();
        plan.apply(&mut df).unwrap();
        assert_eq!(text_values(&df, "SWIFT"), vec!["ABC", ""]);
    }

    #[test]
    fn missing_column_is_created() {
        let mut df = frame(&[Some("x")]);
        let plan = TransformPlan::compile(
            &rules("BANKL", vec![TransformStep::Zfill { width: 3 }]),
            &ExtensionRegistry::new(),
        )
        .unwrap();
        plan.apply(&mut df).unwrap();
        assert_eq!(column_names(&df), vec!["SWIFT", "BANKL"]);
        assert_eq!(text_values(&df, "BANKL"), vec![""]);
    }

    #[test]
    fn unknown_steps_are_skipped() {
        let mut df = frame(&[Some(" a ")]);
        let plan = TransformPlan::compile(
            &rules(
                "SWIFT",
                vec![TransformStep::Unknown("titlecase".into()), TransformStep::Strip],
            ),
            &ExtensionRegistry::new(),
        )
        .unwrap();
        plan.apply(&mut df).unwrap();
        assert_eq!(text_values(&df, "SWIFT"), vec!["a"]);
    }

    #[test]
    fn custom_builtin_and_propagating_error() {
        let mut registry = ExtensionRegistry::with_builtins();
        registry.register_transform("acme.fail", |_: &str| -> std::result::Result<String, ExtensionError> {
            Err(ExtensionError::new("boom"))
        });

        let mut df = frame(&[Some("NL-12 34")]);
        let plan = TransformPlan::compile(
            &rules(
                "SWIFT",
                vec![TransformStep::Custom(ExtensionRef::new("text", "digits_only"))],
            ),
            &registry,
        )
        .unwrap();
        plan.apply(&mut df).unwrap();
        assert_eq!(text_values(&df, "SWIFT"), vec!["1234"]);

        let failing = TransformPlan::compile(
            &rules("SWIFT", vec![TransformStep::Custom(ExtensionRef::new("acme", "fail"))]),
            &registry,
        )
        .unwrap();
        let err = failing.apply(&mut df).unwrap_err();
        assert!(matches!(err, TransformError::Extension { ref message, .. } if message == "boom"));
    }

    #[test]
    fn ensure_columns_appends_blank() {
        let mut df = frame(&[Some("a"), Some("b")]);
        ensure_columns(&mut df, ["SWIFT", "LAND"]).unwrap();
        assert_eq!(column_names(&df), vec!["SWIFT", "LAND"]);
        assert_eq!(text_values(&df, "LAND"), vec!["", ""]);
    }
}
