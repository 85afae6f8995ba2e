//! Reading YAML fragments into configuration trees.

use std::path::{Path, PathBuf};

use myd_model::{ConfigMap, ConfigNode};
use serde_yaml::Value;

use crate::error::{ConfigError, Result};

/// The four fragment kinds a layer directory may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    ColumnMap,
    ValueMap,
    ValueRules,
    Meta,
}

impl FragmentKind {
    pub const ALL: [FragmentKind; 4] = [
        FragmentKind::ColumnMap,
        FragmentKind::ValueMap,
        FragmentKind::ValueRules,
        FragmentKind::Meta,
    ];

    pub fn stem(self) -> &'static str {
        match self {
            FragmentKind::ColumnMap => "column_map",
            FragmentKind::ValueMap => "value_map",
            FragmentKind::ValueRules => "value_rules",
            FragmentKind::Meta => "meta",
        }
    }

    /// Candidate file names in lookup order.
    pub fn file_names(self) -> [String; 2] {
        [format!("{}.yaml", self.stem()), format!("{}.yml", self.stem())]
    }
}

/// Loads the fragment of `kind` from a layer directory.
///
/// `.yaml` is tried first, then `.yml`. Missing and empty files yield `None`.
pub fn load_fragment(dir: &Path, kind: FragmentKind) -> Result<Option<(PathBuf, ConfigNode)>> {
    for name in kind.file_names() {
        let path = dir.join(name);
        if !path.is_file() {
            continue;
        }
        let node = load_yaml_file(&path)?;
        if !node.is_empty() {
            return Ok(Some((path, node)));
        }
    }
    Ok(None)
}

/// Reads and parses a YAML file.
pub fn load_yaml_file(path: &Path) -> Result<ConfigNode> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_yaml(&text, path)
}

/// Parses YAML text; `path` is only used for error messages.
pub fn parse_yaml(text: &str, path: &Path) -> Result<ConfigNode> {
    if text.trim().is_empty() {
        return Ok(ConfigNode::Null);
    }
    let value: Value = serde_yaml::from_str(text).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    Ok(yaml_to_node(value))
}

/// Converts a YAML value, stringifying non-string mapping keys.
pub fn yaml_to_node(value: Value) -> ConfigNode {
    match value {
        Value::Null => ConfigNode::Null,
        Value::Bool(b) => ConfigNode::Bool(b),
        Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                ConfigNode::Int(v)
            } else {
                ConfigNode::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => ConfigNode::Str(s),
        Value::Sequence(items) => ConfigNode::List(items.into_iter().map(yaml_to_node).collect()),
        Value::Mapping(mapping) => {
            let mut map = ConfigMap::new();
            for (key, value) in mapping {
                map.insert(key_string(key), yaml_to_node(value));
            }
            ConfigNode::Map(map)
        }
        Value::Tagged(tagged) => yaml_to_node(tagged.value),
    }
}

fn key_string(key: Value) -> String {
    match key {
        Value::String(s) => s,
        other => yaml_to_node(other)
            .scalar_string()
            .unwrap_or_else(|| "<complex key>".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_keys_are_stringified() {
        let node = parse_yaml("LAND:\n  1: NL\n  true: Y\n", Path::new("value_map.yaml")).unwrap();
        let land = node.get("LAND").and_then(ConfigNode::as_map).unwrap();
        assert_eq!(land.get("1"), Some(&ConfigNode::from("NL")));
        assert_eq!(land.get("true"), Some(&ConfigNode::from("Y")));
    }

    #[test]
    fn empty_text_is_null() {
        assert!(parse_yaml("  \n", Path::new("meta.yaml")).unwrap().is_null());
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let err = parse_yaml("a: [1, 2", Path::new("meta.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn yml_is_used_when_yaml_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("meta.yml"), "delimiter: ';'\n").unwrap();
        let (path, node) = load_fragment(dir.path(), FragmentKind::Meta).unwrap().unwrap();
        assert!(path.ends_with("meta.yml"));
        assert_eq!(node.get("delimiter"), Some(&ConfigNode::from(";")));
        assert!(load_fragment(dir.path(), FragmentKind::ColumnMap).unwrap().is_none());
    }
}
