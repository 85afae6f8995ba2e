//! Text cleanup applied to raw values before any rule runs.

use myd_common::{column_names, has_column, optional_values, set_optional_column};
use myd_model::TextOptions;
use polars::prelude::{AnyValue, DataFrame, PolarsResult};
use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;

/// Accented letters as they appear when UTF-8 is read as Latin-1.
pub const MOJIBAKE_SUSPECTS: &[&str] = &[
    "Ã¶", "Ã¤", "Ã¼", "ÃŸ", "Ã©", "Ãª", "Ã¡", "Ãº", "Ã±", "Ã¸", "Ã¥",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalForm {
    Nfc,
    Nfkc,
    Nfd,
    Nfkd,
}

impl NormalForm {
    /// Parses a form name; `none` and unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "NFC" => Some(Self::Nfc),
            "NFKC" => Some(Self::Nfkc),
            "NFD" => Some(Self::Nfd),
            "NFKD" => Some(Self::Nfkd),
            "" | "NONE" => None,
            other => {
                warn!(form = %other, "unknown normalization form, skipping");
                None
            }
        }
    }

    fn apply(self, value: &str) -> String {
        match self {
            Self::Nfc => value.nfc().collect(),
            Self::Nfkc => value.nfkc().collect(),
            Self::Nfd => value.nfd().collect(),
            Self::Nfkd => value.nfkd().collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    normalize: Option<NormalForm>,
    strip_control: bool,
    collapse_ws: bool,
    repair_mojibake: bool,
    columns: Vec<String>,
}

impl Sanitizer {
    pub fn from_options(options: &TextOptions) -> Self {
        Self {
            normalize: options.normalize.as_deref().and_then(NormalForm::parse),
            strip_control: options.strip_control,
            collapse_ws: options.collapse_ws,
            repair_mojibake: options.repair_mojibake,
            columns: options.columns.clone(),
        }
    }

    /// True when no step is enabled.
    pub fn is_noop(&self) -> bool {
        self.normalize.is_none() && !self.strip_control && !self.collapse_ws && !self.repair_mojibake
    }

    /// Cleans one value. Steps run normalize, strip control, collapse
    /// whitespace, repair mojibake.
    pub fn clean(&self, value: &str) -> String {
        let mut out = match self.normalize {
            Some(form) => form.apply(value),
            None => value.to_string(),
        };
        if self.strip_control {
            out = strip_control(&out);
        }
        if self.collapse_ws {
            out = out.split_whitespace().collect::<Vec<_>>().join(" ");
        }
        if self.repair_mojibake {
            out = repair_mojibake(&out);
        }
        out
    }

    /// Cleans the selected columns in place and returns the number of
    /// changed cells. Nulls stay null.
    pub fn apply(&self, df: &mut DataFrame) -> PolarsResult<usize> {
        if self.is_noop() {
            return Ok(0);
        }
        let targets: Vec<String> = if self.columns.is_empty() {
            column_names(df)
        } else {
            self.columns
                .iter()
                .filter(|name| has_column(df, name))
                .cloned()
                .collect()
        };
        let mut changed = 0;
        for column in targets {
            let values: Vec<Option<String>> = optional_values(df, &column)?
                .into_iter()
                .map(|value| {
                    value.map(|v| {
                        let cleaned = self.clean(&v);
                        if cleaned != v {
                            changed += 1;
                        }
                        cleaned
                    })
                })
                .collect();
            set_optional_column(df, &column, values)?;
        }
        debug!(changed, "sanitized text");
        Ok(changed)
    }
}

/// Drops C0 controls other than tab, newline and carriage return, and DEL.
pub fn strip_control(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{7F}'))
        .collect()
}

/// Re-decodes a value that looks like UTF-8 read as Latin-1.
///
/// Only values containing `Ã` followed by a U+0080..U+00BF character are
/// touched; if the Latin-1 bytes are not valid UTF-8 the value is kept.
pub fn repair_mojibake(value: &str) -> String {
    let suspicious = value
        .chars()
        .zip(value.chars().skip(1))
        .any(|(a, b)| a == 'Ã' && ('\u{80}'..='\u{BF}').contains(&b));
    if !suspicious {
        return value.to_string();
    }
    let bytes: Option<Vec<u8>> = value
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect();
    bytes
        .and_then(|b| String::from_utf8(b).ok())
        .unwrap_or_else(|| value.to_string())
}

/// A value that looks like mojibake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MojibakeHit {
    pub column: String,
    pub value: String,
}

/// Scans up to `limit` non-null values for mojibake sequences.
pub fn detect_mojibake(df: &DataFrame, limit: usize) -> Option<MojibakeHit> {
    let mut scanned = 0;
    for column in df.get_columns() {
        for idx in 0..df.height() {
            if scanned >= limit {
                return None;
            }
            if let Ok(AnyValue::String(value)) = column.get(idx) {
                scanned += 1;
                if MOJIBAKE_SUSPECTS.iter().any(|s| value.contains(s)) {
                    return Some(MojibakeHit {
                        column: column.name().to_string(),
                        value: value.to_string(),
                    });
                }
            }
        }
    }
    None
}
