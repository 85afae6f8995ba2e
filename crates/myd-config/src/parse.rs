//! Typed interpretation of merged fragments.
//!
//! Unknown rule keys and unknown transform step names are tolerated; values
//! that are present but malformed are configuration errors.

use indexmap::IndexMap;
use myd_model::{
    ColumnMap, ConfigMap, ConfigNode, ExtensionRef, MetaOptions, TransformStep, ValueMap, ValueRule,
    ValueRules,
};
use tracing::{debug, warn};

use crate::error::{ConfigError, Result};

/// Parses the column map; a null or blank target maps a column to itself.
pub fn parse_column_map(node: &ConfigNode) -> Result<ColumnMap> {
    let mut out = ColumnMap::new();
    let Some(map) = mapping(node, "column_map")? else {
        return Ok(out);
    };
    for (source, target) in map {
        let target = target
            .scalar_string()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| source.clone());
        out.insert(source.clone(), target);
    }
    Ok(out)
}

/// Parses per-column value substitutions.
///
/// Null replacements become empty strings; list or map replacements are
/// skipped.
pub fn parse_value_map(node: &ConfigNode) -> Result<ValueMap> {
    let mut out = ValueMap::new();
    let Some(map) = mapping(node, "value_map")? else {
        return Ok(out);
    };
    for (column, entries) in map {
        let Some(entries) = entries.as_map() else {
            if !entries.is_null() {
                warn!(column = %column, kind = entries.kind(), "value_map entry is not a mapping; skipped");
            }
            continue;
        };
        let mut replacements = IndexMap::new();
        for (raw, replacement) in entries {
            match replacement.scalar_string() {
                Some(value) => {
                    replacements.insert(raw.clone(), value);
                }
                None => {
                    warn!(column = %column, value = %raw, "non-scalar replacement skipped");
                }
            }
        }
        out.insert(column.clone(), replacements);
    }
    Ok(out)
}

/// Parses the value rules of every column.
pub fn parse_value_rules(node: &ConfigNode) -> Result<ValueRules> {
    let mut out = ValueRules::new();
    let Some(map) = mapping(node, "value_rules")? else {
        return Ok(out);
    };
    for (column, spec) in map {
        out.insert(column.clone(), parse_rule(column, spec)?);
    }
    Ok(out)
}

fn parse_rule(column: &str, spec: &ConfigNode) -> Result<ValueRule> {
    if spec.is_null() {
        return Ok(ValueRule::default());
    }
    let Some(spec) = spec.as_map() else {
        return Err(invalid(column, format!("expected a mapping, found {}", spec.kind())));
    };
    let mut rule = ValueRule {
        required: spec.get("required").is_some_and(ConfigNode::is_truthy),
        ..ValueRule::default()
    };
    if let Some(pattern) = spec.get("pattern").and_then(ConfigNode::scalar_string) {
        rule.pattern = Some(pattern).filter(|p| !p.is_empty());
    }
    if let Some(node) = spec.get("max_length").filter(|n| !n.is_null()) {
        let bound = node
            .as_i64()
            .filter(|v| *v > 0)
            .ok_or_else(|| invalid(column, "max_length must be a positive integer"))?;
        rule.max_length = usize::try_from(bound).ok();
    }
    if let Some(steps) = spec.get("transforms") {
        rule.transforms = parse_steps(column, steps)?;
    }
    if let Some(custom) = spec.get("custom").filter(|n| n.is_truthy()) {
        rule.custom = Some(parse_extension(column, custom)?);
    }
    Ok(rule)
}

/// Parses a transform chain. Entries that are neither a name nor a
/// single-key mapping are skipped.
pub fn parse_steps(column: &str, node: &ConfigNode) -> Result<Vec<TransformStep>> {
    if node.is_null() {
        return Ok(Vec::new());
    }
    let Some(items) = node.as_list() else {
        return Err(invalid(column, "transforms must be a list"));
    };
    let mut steps = Vec::with_capacity(items.len());
    for item in items {
        match item {
            ConfigNode::Str(name) => steps.push(parse_step(column, name, &ConfigNode::Null)?),
            ConfigNode::Map(map) if map.len() == 1 => {
                if let Some((name, arg)) = map.first() {
                    steps.push(parse_step(column, name, arg)?);
                }
            }
            other => {
                debug!(column = %column, kind = other.kind(), "transform step skipped");
            }
        }
    }
    Ok(steps)
}

fn parse_step(column: &str, name: &str, arg: &ConfigNode) -> Result<TransformStep> {
    let step = match name {
        "strip" => TransformStep::Strip,
        "upper" => TransformStep::Upper,
        "lower" => TransformStep::Lower,
        "to_int" => TransformStep::ToInt,
        "to_string" => TransformStep::ToString,
        "zfill" => {
            let width = arg
                .get("width")
                .unwrap_or(arg)
                .as_i64()
                .and_then(|w| usize::try_from(w).ok())
                .ok_or_else(|| invalid(column, "zfill width must be a non-negative integer"))?;
            TransformStep::Zfill { width }
        }
        "pad_left" => {
            let width = match arg {
                ConfigNode::Null => 0,
                ConfigNode::Map(map) => match map.get("width") {
                    None | Some(ConfigNode::Null) => 0,
                    Some(node) => width_of(column, node)?,
                },
                other => width_of(column, other)?,
            };
            let fillchar = arg
                .get("fillchar")
                .and_then(ConfigNode::scalar_string)
                .and_then(|s| s.chars().next())
                .unwrap_or(' ');
            TransformStep::PadLeft { width, fillchar }
        }
        "regex_replace" => TransformStep::RegexReplace {
            pattern: arg
                .get("pattern")
                .and_then(ConfigNode::scalar_string)
                .filter(|p| !p.is_empty()),
            repl: arg
                .get("repl")
                .and_then(ConfigNode::scalar_string)
                .unwrap_or_default(),
        },
        "custom" => TransformStep::Custom(parse_extension(column, arg)?),
        other => TransformStep::Unknown(other.to_string()),
    };
    Ok(step)
}

fn width_of(column: &str, node: &ConfigNode) -> Result<usize> {
    node.as_i64()
        .and_then(|w| usize::try_from(w).ok())
        .ok_or_else(|| invalid(column, "pad_left width must be a non-negative integer"))
}

/// Parses a `{module, function}` extension reference.
pub fn parse_extension(column: &str, node: &ConfigNode) -> Result<ExtensionRef> {
    let module = node
        .get("module")
        .and_then(ConfigNode::scalar_string)
        .filter(|s| !s.is_empty());
    let function = node
        .get("function")
        .and_then(ConfigNode::scalar_string)
        .filter(|s| !s.is_empty());
    match (module, function) {
        (Some(module), Some(function)) => Ok(ExtensionRef { module, function }),
        _ => Err(invalid(column, "custom requires both module and function")),
    }
}

/// Deserializes the merged meta tree into typed options.
pub fn parse_meta(node: &ConfigNode) -> Result<MetaOptions> {
    if node.is_empty() {
        return Ok(MetaOptions::default());
    }
    let value = serde_yaml::to_value(node).map_err(|err| ConfigError::InvalidMeta {
        message: err.to_string(),
    })?;
    serde_yaml::from_value(value).map_err(|err| ConfigError::InvalidMeta {
        message: err.to_string(),
    })
}

fn mapping<'a>(
    node: &'a ConfigNode,
    fragment: &'static str,
) -> Result<Option<&'a ConfigMap>> {
    match node {
        ConfigNode::Null => Ok(None),
        ConfigNode::Map(map) => Ok(Some(map)),
        other => Err(ConfigError::FragmentShape {
            fragment,
            found: other.kind(),
        }),
    }
}

fn invalid(column: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidRule {
        column: column.to_string(),
        message: message.into(),
    }
}
