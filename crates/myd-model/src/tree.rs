//! Untyped configuration tree.
//!
//! Every configuration fragment is loaded into a [`ConfigNode`] before it is
//! merged with the other layers. Maps keep insertion order so that the column
//! map retains the order in which columns were declared.

use indexmap::IndexMap;
use serde::Serialize;

/// Ordered string-keyed map of configuration nodes.
pub type ConfigMap = IndexMap<String, ConfigNode>;

/// A node in a configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigNode {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ConfigNode>),
    Map(ConfigMap),
}

impl ConfigNode {
    /// An empty map node.
    pub fn empty_map() -> Self {
        Self::Map(ConfigMap::new())
    }

    /// Returns true for null, empty strings, empty lists and empty maps.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Str(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Map(map) => map.is_empty(),
            Self::Bool(_) | Self::Int(_) | Self::Float(_) => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ConfigNode]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a key when this node is a map.
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Truthiness in the YAML sense: null, false, zero and empty values are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(v) => *v != 0,
            Self::Float(v) => *v != 0.0,
            other => !other.is_empty(),
        }
    }

    /// Integer view of the node.
    ///
    /// Accepts integers, integral floats and strings holding either.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
            Self::Str(s) => {
                let trimmed = s.trim();
                trimmed.parse::<i64>().ok().or_else(|| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite() && v.fract() == 0.0)
                        .map(|v| v as i64)
                })
            }
            _ => None,
        }
    }

    /// Textual form of a scalar node; `None` for lists and maps.
    ///
    /// Null renders as an empty string.
    pub fn scalar_string(&self) -> Option<String> {
        match self {
            Self::Null => Some(String::new()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(v) => Some(v.to_string()),
            Self::Float(v) => Some(render_float(*v)),
            Self::Str(s) => Some(s.clone()),
            Self::List(_) | Self::Map(_) => None,
        }
    }

    /// Short name of the node kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

fn render_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

impl From<&str> for ConfigNode {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ConfigNode {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ConfigNode {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for ConfigNode {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<ConfigMap> for ConfigNode {
    fn from(value: ConfigMap) -> Self {
        Self::Map(value)
    }
}

impl From<Vec<ConfigNode>> for ConfigNode {
    fn from(value: Vec<ConfigNode>) -> Self {
        Self::List(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_view_accepts_numeric_strings() {
        assert_eq!(ConfigNode::from("11").as_i64(), Some(11));
        assert_eq!(ConfigNode::from(" 5.0 ").as_i64(), Some(5));
        assert_eq!(ConfigNode::Float(2.5).as_i64(), None);
        assert_eq!(ConfigNode::from("five").as_i64(), None);
    }

    #[test]
    fn scalar_strings() {
        assert_eq!(ConfigNode::Null.scalar_string().as_deref(), Some(""));
        assert_eq!(ConfigNode::Int(7).scalar_string().as_deref(), Some("7"));
        assert_eq!(ConfigNode::Float(1.0).scalar_string().as_deref(), Some("1.0"));
        assert_eq!(ConfigNode::List(vec![]).scalar_string(), None);
    }

    #[test]
    fn serializes_untagged() {
        let mut map = ConfigMap::new();
        map.insert("enabled".into(), ConfigNode::Bool(false));
        map.insert("keys".into(), ConfigNode::List(vec!["BANKL".into()]));
        let json = serde_json::to_string(&ConfigNode::Map(map)).expect("serialize");
        assert_eq!(json, r#"{"enabled":false,"keys":["BANKL"]}"#);
    }
}
