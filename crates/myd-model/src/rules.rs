//! Typed value rules: transform chains and validation checks per column.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reference to a registered extension (custom transform or validator).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtensionRef {
    pub module: String,
    pub function: String,
}

impl ExtensionRef {
    pub fn new(module: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            function: function.into(),
        }
    }

    /// Registry identifier, `module.function`.
    pub fn id(&self) -> String {
        format!("{}.{}", self.module, self.function)
    }
}

/// One step of a column transform chain.
///
/// Steps always operate on the current textual value of the column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformStep {
    Strip,
    Upper,
    Lower,
    Zfill {
        width: usize,
    },
    PadLeft {
        width: usize,
        fillchar: char,
    },
    /// Global regex substitution. A missing pattern makes the step a no-op.
    RegexReplace {
        pattern: Option<String>,
        repl: String,
    },
    ToInt,
    ToString,
    Custom(ExtensionRef),
    /// A step name this version does not know; skipped at execution time.
    Unknown(String),
}

impl TransformStep {
    /// Every step name the engine executes.
    pub const KNOWN: &'static [&'static str] = &[
        "strip",
        "upper",
        "lower",
        "zfill",
        "pad_left",
        "regex_replace",
        "to_int",
        "to_string",
        "custom",
    ];

    pub fn name(&self) -> &str {
        match self {
            Self::Strip => "strip",
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Zfill { .. } => "zfill",
            Self::PadLeft { .. } => "pad_left",
            Self::RegexReplace { .. } => "regex_replace",
            Self::ToInt => "to_int",
            Self::ToString => "to_string",
            Self::Custom(_) => "custom",
            Self::Unknown(name) => name,
        }
    }
}

/// Rules declared for a single column in `value_rules`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRule {
    pub required: bool,
    pub pattern: Option<String>,
    pub max_length: Option<usize>,
    pub transforms: Vec<TransformStep>,
    pub custom: Option<ExtensionRef>,
}

impl ValueRule {
    /// Returns true when the rule declares at least one validation check.
    pub fn has_checks(&self) -> bool {
        self.required || self.pattern.is_some() || self.max_length.is_some() || self.custom.is_some()
    }

    pub fn has_transforms(&self) -> bool {
        !self.transforms.is_empty()
    }
}

/// Ordered source column → target column mapping.
pub type ColumnMap = IndexMap<String, String>;

/// Per source column: raw value → replacement.
pub type ValueMap = IndexMap<String, IndexMap<String, String>>;

/// Per column value rules, in declaration order.
pub type ValueRules = IndexMap<String, ValueRule>;
