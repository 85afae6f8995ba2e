//! Compiled transform steps and the string helpers behind them.

use std::fmt;
use std::sync::Arc;

use myd_model::TransformStep;
use regex::Regex;

use crate::error::{Result, TransformError};
use crate::registry::{ExtensionRegistry, TransformExtension};

/// A transform step ready to run: patterns compiled, extensions resolved.
#[derive(Clone)]
pub enum CompiledStep {
    Strip,
    Upper,
    Lower,
    Zfill(usize),
    PadLeft { width: usize, fill: char },
    RegexReplace { pattern: Regex, repl: String },
    ToInt,
    ToString,
    Custom {
        id: String,
        extension: Arc<dyn TransformExtension>,
    },
    /// Unknown step name or a replace without pattern.
    Noop(String),
}

impl CompiledStep {
    pub fn compile(column: &str, step: &TransformStep, registry: &ExtensionRegistry) -> Result<Self> {
        Ok(match step {
            TransformStep::Strip => Self::Strip,
            TransformStep::Upper => Self::Upper,
            TransformStep::Lower => Self::Lower,
            TransformStep::Zfill { width } => Self::Zfill(*width),
            TransformStep::PadLeft { width, fillchar } => Self::PadLeft {
                width: *width,
                fill: *fillchar,
            },
            TransformStep::RegexReplace { pattern: None, .. } => {
                Self::Noop("regex_replace".to_string())
            }
            TransformStep::RegexReplace {
                pattern: Some(pattern),
                repl,
            } => Self::RegexReplace {
                pattern: Regex::new(pattern).map_err(|e| TransformError::InvalidPattern {
                    column: column.to_string(),
                    message: e.to_string(),
                })?,
                repl: repl.clone(),
            },
            TransformStep::ToInt => Self::ToInt,
            TransformStep::ToString => Self::ToString,
            TransformStep::Custom(reference) => {
                let extension =
                    registry
                        .transform(reference)
                        .ok_or_else(|| TransformError::UnknownExtension {
                            column: column.to_string(),
                            id: reference.id(),
                        })?;
                Self::Custom {
                    id: reference.id(),
                    extension,
                }
            }
            TransformStep::Unknown(name) => Self::Noop(name.clone()),
        })
    }

    /// Runs the step over one value.
    pub fn apply(&self, column: &str, value: &str) -> Result<String> {
        Ok(match self {
            Self::Strip => value.trim().to_string(),
            Self::Upper => value.to_uppercase(),
            Self::Lower => value.to_lowercase(),
            Self::Zfill(width) => {
                if value.trim().is_empty() {
                    String::new()
                } else {
                    zfill(value, *width)
                }
            }
            Self::PadLeft { width, fill } => {
                if value.trim().is_empty() {
                    String::new()
                } else {
                    pad_left(value, *width, *fill)
                }
            }
            Self::RegexReplace { pattern, repl } => {
                pattern.replace_all(value, repl.as_str()).into_owned()
            }
            Self::ToInt => to_int_string(value),
            Self::ToString | Self::Noop(_) => value.to_string(),
            Self::Custom { id, extension } => {
                extension
                    .apply(value)
                    .map_err(|e| TransformError::Extension {
                        column: column.to_string(),
                        id: id.clone(),
                        message: e.message,
                    })?
            }
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Strip => "strip",
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Zfill(_) => "zfill",
            Self::PadLeft { .. } => "pad_left",
            Self::RegexReplace { .. } => "regex_replace",
            Self::ToInt => "to_int",
            Self::ToString => "to_string",
            Self::Custom { .. } => "custom",
            Self::Noop(name) => name,
        }
    }
}

impl fmt::Debug for CompiledStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zfill(width) => write!(f, "zfill({width})"),
            Self::PadLeft { width, fill } => write!(f, "pad_left({width}, {fill:?})"),
            Self::RegexReplace { pattern, repl } => {
                write!(f, "regex_replace({:?} -> {repl:?})", pattern.as_str())
            }
            Self::Custom { id, .. } => write!(f, "custom({id})"),
            Self::Noop(name) => write!(f, "noop({name})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Left-pads with zeros to `width` characters, keeping a leading sign in front.
pub fn zfill(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    let zeros = "0".repeat(width - len);
    match value.chars().next() {
        Some(sign @ ('+' | '-')) => format!("{sign}{zeros}{}", &value[sign.len_utf8()..]),
        _ => format!("{zeros}{value}"),
    }
}

/// Right-justifies `value` in `width` characters using `fill`.
pub fn pad_left(value: &str, width: usize, fill: char) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    let mut out: String = std::iter::repeat_n(fill, width - len).collect();
    out.push_str(value);
    out
}

/// Canonical integer text of a numeric value, truncating any fraction.
///
/// Blank stays blank. A value that does not parse is returned trimmed.
pub fn to_int_string(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return v.to_string();
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => {
            let truncated = v.trunc();
            if truncated == 0.0 {
                "0".to_string()
            } else {
                format!("{truncated:.0}")
            }
        }
        _ => trimmed.to_string(),
    }
}
