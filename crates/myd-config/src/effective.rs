//! The effective configuration of a run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use myd_model::{ColumnMap, MetaOptions, ValueMap, ValueRules};
use tracing::info;

use crate::error::{ConfigError, Result};
use crate::layers::{LayeredConfig, load_layered};
use crate::parse::{parse_column_map, parse_meta, parse_value_map, parse_value_rules};
use crate::target::ObjectVariant;

/// All layers merged and parsed into typed form. Immutable once built.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub target: ObjectVariant,
    pub layers: Vec<PathBuf>,
    pub column_map: ColumnMap,
    pub value_map: ValueMap,
    pub value_rules: ValueRules,
    pub meta: MetaOptions,
}

impl EffectiveConfig {
    /// Loads, merges and parses the configuration for `target`.
    pub fn resolve(root: &Path, target: &ObjectVariant) -> Result<Self> {
        let layered = load_layered(root, target)?;
        Self::from_layered(&layered)
    }

    /// Parses already merged fragments.
    ///
    /// Fails when no layer contributed a column map or when two sources
    /// share a target column.
    pub fn from_layered(layered: &LayeredConfig) -> Result<Self> {
        let column_map = parse_column_map(&layered.column_map)?;
        if column_map.is_empty() {
            return Err(ConfigError::MissingColumnMap {
                root: layered.root.clone(),
                label: layered.target.label(),
            });
        }
        check_unique_targets(&column_map)?;
        let config = Self {
            target: layered.target.clone(),
            layers: layered.layers.clone(),
            column_map,
            value_map: parse_value_map(&layered.value_map)?,
            value_rules: parse_value_rules(&layered.value_rules)?,
            meta: parse_meta(&layered.meta)?,
        };
        info!(
            label = %config.target.label(),
            layers = config.layers.len(),
            columns = config.column_map.len(),
            rules = config.value_rules.len(),
            "configuration resolved"
        );
        Ok(config)
    }
}

/// Rejects a column map in which two sources export to the same target.
fn check_unique_targets(column_map: &ColumnMap) -> Result<()> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for (source, target) in column_map {
        if let Some(first) = seen.insert(target.as_str(), source.as_str()) {
            return Err(ConfigError::DuplicateTarget {
                target: target.clone(),
                first: first.to_string(),
                second: source.clone(),
            });
        }
    }
    Ok(())
}
