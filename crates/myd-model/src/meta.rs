//! Typed view of the merged `meta` fragment.
//!
//! Every field has a default so that a partial `meta.yaml` (or none at all)
//! yields a usable configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::filter::FilterSpec;

/// Default timezone for lineage timestamps and run naming.
pub const DEFAULT_TZ: &str = "Europe/Amsterdam";

/// Default encoding for every written artifact (UTF-8 with byte-order mark).
pub const DEFAULT_ENCODING: &str = "utf-8-sig";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaOptions {
    pub dirs: DirOptions,
    pub naming: NamingOptions,
    pub input_file: Option<String>,
    pub output_file: Option<String>,
    pub reject_file: Option<String>,
    /// Field delimiter for CSV sources; auto-detected when unset.
    pub delimiter: Option<String>,
    /// Worksheet of a workbook input; the first sheet when unset.
    pub sheet: Option<SheetSelector>,
    pub sources: Vec<SourceSpec>,
    /// Name of the source the joins start from (defaults to the first source).
    pub base: Option<String>,
    pub joins: Vec<JoinSpec>,
    pub filters: Vec<FilterSpec>,
    pub lineage: LineageOptions,
    pub encoding: EncodingOptions,
    pub reports: ReportOptions,
    pub text: Option<TextOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirOptions {
    pub raw: String,
    pub out: String,
    pub rejects: String,
}

impl Default for DirOptions {
    fn default() -> Self {
        Self {
            raw: "data/raw".to_string(),
            out: "data/out".to_string(),
            rejects: "data/rejects".to_string(),
        }
    }
}

/// File-name templates; see the naming token vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingOptions {
    pub input: Option<String>,
    pub output: Option<String>,
    pub rejects: Option<String>,
    pub report: Option<String>,
    pub log: Option<String>,
}

impl NamingOptions {
    pub const DEFAULT_OUTPUT: &'static str = "{datetime_hm_u}_{label_lower}_output.csv";
    pub const DEFAULT_REJECTS: &'static str = "{datetime_hm_u}_{label_lower}_rejected.csv";
    pub const DEFAULT_REPORT: &'static str = "{datetime_hm_u}_{label_lower}_report_{stage}.{ext}";
    pub const DEFAULT_LOG: &'static str = "{datetime_hm_u}_{label_lower}_log.txt";
    pub const REJECT_REASONS: &'static str = "{datetime_hm_u}_{label_lower}_reject_reasons.csv";

    pub fn output_pattern(&self) -> &str {
        self.output.as_deref().unwrap_or(Self::DEFAULT_OUTPUT)
    }

    pub fn rejects_pattern(&self) -> &str {
        self.rejects.as_deref().unwrap_or(Self::DEFAULT_REJECTS)
    }

    pub fn report_pattern(&self) -> &str {
        self.report.as_deref().unwrap_or(Self::DEFAULT_REPORT)
    }

    pub fn log_pattern(&self) -> &str {
        self.log.as_deref().unwrap_or(Self::DEFAULT_LOG)
    }
}

/// One named input table for multi-source assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSpec {
    pub name: String,
    pub path: Option<String>,
    pub delimiter: Option<String>,
    pub sheet: Option<SheetSelector>,
}

/// Worksheet picked by name or by zero-based position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl SheetSelector {
    /// Reads a command-line value: digits select by position, anything else by name.
    pub fn from_arg(value: &str) -> Self {
        value
            .trim()
            .parse()
            .map_or_else(|_| Self::Name(value.to_string()), Self::Index)
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(idx) => write!(f, "#{idx}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinHow {
    #[default]
    Left,
    Inner,
}

/// Join keys given either as a single column or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyColumns {
    One(String),
    Many(Vec<String>),
}

impl KeyColumns {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::One(name) => vec![name.clone()],
            Self::Many(names) => names.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinSpec {
    pub right: Option<String>,
    pub how: JoinHow,
    pub on: Option<KeyColumns>,
    pub left_on: Option<KeyColumns>,
    pub right_on: Option<KeyColumns>,
    pub suffixes: Option<(String, String)>,
}

impl JoinSpec {
    /// Left and right key columns, or `None` when the join declares no keys.
    pub fn key_columns(&self) -> Option<(Vec<String>, Vec<String>)> {
        if let Some(on) = &self.on {
            let keys = on.to_vec();
            return Some((keys.clone(), keys));
        }
        match (&self.left_on, &self.right_on) {
            (Some(left), Some(right)) => Some((left.to_vec(), right.to_vec())),
            _ => None,
        }
    }

    pub fn suffix_pair(&self) -> (String, String) {
        self.suffixes
            .clone()
            .unwrap_or_else(|| (String::new(), "_r".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineageOptions {
    pub enabled: bool,
    pub tz: String,
    pub keep_in_export: bool,
    pub uid: UidOptions,
}

impl Default for LineageOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            tz: DEFAULT_TZ.to_string(),
            keep_in_export: false,
            uid: UidOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UidOptions {
    pub enabled: bool,
    pub keys: Vec<String>,
    pub length: usize,
    pub salt: String,
}

impl Default for UidOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            keys: Vec::new(),
            length: 16,
            salt: "{label}".to_string(),
        }
    }
}

/// Encoding per artifact kind; unset entries fall back to [`DEFAULT_ENCODING`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingOptions {
    pub output: Option<String>,
    pub rejects: Option<String>,
    pub log_txt: Option<String>,
    pub reports_md: Option<String>,
    pub reports_html: Option<String>,
    pub reports_csv: Option<String>,
}

impl EncodingOptions {
    pub fn output(&self) -> &str {
        self.output.as_deref().unwrap_or(DEFAULT_ENCODING)
    }

    pub fn rejects(&self) -> &str {
        self.rejects.as_deref().unwrap_or(DEFAULT_ENCODING)
    }

    pub fn log_txt(&self) -> &str {
        self.log_txt.as_deref().unwrap_or(DEFAULT_ENCODING)
    }

    pub fn reports_md(&self) -> &str {
        self.reports_md.as_deref().unwrap_or(DEFAULT_ENCODING)
    }

    pub fn reports_html(&self) -> &str {
        self.reports_html.as_deref().unwrap_or(DEFAULT_ENCODING)
    }

    pub fn reports_csv(&self) -> &str {
        self.reports_csv.as_deref().unwrap_or(DEFAULT_ENCODING)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    pub stages: Vec<String>,
}

/// Text sanitizer options (`meta.text`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// Unicode normalization form: NFC, NFKC, NFD, NFKD or none.
    pub normalize: Option<String>,
    pub strip_control: bool,
    pub collapse_ws: bool,
    pub repair_mojibake: bool,
    /// Restrict sanitizing to these columns; empty means every column.
    pub columns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_meta_keeps_defaults() {
        let yaml = "dirs:\n  raw: input\nlineage:\n  uid:\n    enabled: true\n    keys: [BANKS, BANKL]\n";
        let meta: MetaOptions = serde_yaml::from_str(yaml).expect("parse meta");
        assert_eq!(meta.dirs.raw, "input");
        assert_eq!(meta.dirs.out, "data/out");
        assert!(meta.lineage.enabled);
        assert_eq!(meta.lineage.tz, DEFAULT_TZ);
        assert_eq!(meta.lineage.uid.length, 16);
        assert_eq!(meta.lineage.uid.keys, vec!["BANKS", "BANKL"]);
        assert_eq!(meta.encoding.output(), DEFAULT_ENCODING);
    }

    #[test]
    fn join_keys_from_on_or_pair() {
        let join: JoinSpec = serde_yaml::from_str("right: addr\non: BANKL\n").expect("parse");
        assert_eq!(
            join.key_columns(),
            Some((vec!["BANKL".to_string()], vec!["BANKL".to_string()]))
        );
        let join: JoinSpec =
            serde_yaml::from_str("right: addr\nleft_on: [A]\nright_on: [B]\nhow: inner\n")
                .expect("parse");
        assert_eq!(join.how, JoinHow::Inner);
        assert_eq!(
            join.key_columns(),
            Some((vec!["A".to_string()], vec!["B".to_string()]))
        );
        assert_eq!(join.suffix_pair(), (String::new(), "_r".to_string()));
    }

    #[test]
    fn sheet_by_name_or_position() {
        let meta: MetaOptions =
            serde_yaml::from_str("sheet: Banks\nsources:\n  - name: a\n    sheet: 1\n")
                .expect("parse");
        assert_eq!(meta.sheet, Some(SheetSelector::Name("Banks".to_string())));
        assert_eq!(meta.sources[0].sheet, Some(SheetSelector::Index(1)));
        assert_eq!(SheetSelector::from_arg("2"), SheetSelector::Index(2));
        assert_eq!(SheetSelector::from_arg("Banks 2"), SheetSelector::Name("Banks 2".to_string()));
        assert_eq!(SheetSelector::Index(0).to_string(), "#0");
    }
}
