//! Row filters for multi-source input.
//!
//! A filter is written either as a mapping
//! (`{column: LAND, op: in, values: [NL, BE]}`) or as a short query string:
//! `LAND == 'NL'`, `LAND != 'NL'`, `LAND in ['NL', 'BE']`,
//! `LAND not in ['DE']`. Backticks quote column names holding spaces.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static QUERY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:`(?P<quoted>[^`]+)`|(?P<column>[^\s=!`]+))\s*(?P<op>==|!=|not\s+in\b|in\b)\s*(?P<rhs>.*?)\s*$",
    )
    .expect("valid filter query regex")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    #[default]
    Eq,
    Ne,
    NotBlank,
    Blank,
    In,
    NotIn,
}

/// Row filter applied to the base source before joins.
///
/// Cell values are compared after trimming; a null cell reads as `""`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FilterEntry")]
pub struct FilterSpec {
    pub column: String,
    pub op: FilterOp,
    pub value: Option<String>,
    pub values: Vec<String>,
}

impl FilterSpec {
    /// Parses the query-string form.
    pub fn parse_query(query: &str) -> Result<Self, String> {
        let caps = QUERY_REGEX
            .captures(query)
            .ok_or_else(|| format!("unsupported filter '{query}'"))?;
        let column = caps
            .name("quoted")
            .or_else(|| caps.name("column"))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let op = caps.name("op").map(|m| m.as_str()).unwrap_or_default();
        let rhs = caps.name("rhs").map(|m| m.as_str()).unwrap_or_default();

        match op {
            "==" | "!=" => {
                let value = unquote(rhs)
                    .ok_or_else(|| format!("filter '{query}': expected a literal after {op}"))?;
                Ok(Self {
                    column,
                    op: if op == "==" { FilterOp::Eq } else { FilterOp::Ne },
                    value: Some(value),
                    values: Vec::new(),
                })
            }
            _ => {
                let values = parse_list(rhs)
                    .ok_or_else(|| format!("filter '{query}': expected a list like ['A', 'B']"))?;
                Ok(Self {
                    column,
                    op: if op == "in" { FilterOp::In } else { FilterOp::NotIn },
                    value: None,
                    values,
                })
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FilterEntry {
    Query(String),
    Structured(StructuredFilter),
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct StructuredFilter {
    column: String,
    op: FilterOp,
    value: Option<String>,
    values: Vec<String>,
}

impl TryFrom<FilterEntry> for FilterSpec {
    type Error = String;

    fn try_from(entry: FilterEntry) -> Result<Self, Self::Error> {
        match entry {
            FilterEntry::Query(query) => Self::parse_query(&query),
            FilterEntry::Structured(s) => Ok(Self {
                column: s.column,
                op: s.op,
                value: s.value,
                values: s.values,
            }),
        }
    }
}

fn unquote(raw: &str) -> Option<String> {
    let raw = raw.trim();
    for quote in ['\'', '"'] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            let inner = &raw[1..raw.len() - 1];
            return (!inner.contains(quote)).then(|| inner.to_string());
        }
    }
    (!raw.is_empty() && !raw.contains(char::is_whitespace)).then(|| raw.to_string())
}

fn parse_list(raw: &str) -> Option<Vec<String>> {
    let inner = raw
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .or_else(|| raw.strip_prefix('(').and_then(|r| r.strip_suffix(')')))?;
    inner
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(unquote)
        .collect()
}
