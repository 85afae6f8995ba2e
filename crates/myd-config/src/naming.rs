//! File-name and identifier templates.
//!
//! Templates use `{token}` placeholders; `{{` and `}}` are literal braces. A
//! template that references an unknown token, or is otherwise malformed, is
//! returned unchanged.

use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::{DateTime, TimeZone};

use crate::target::ObjectVariant;

/// A fixed set of named substitution values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    tokens: BTreeMap<String, String>,
}

impl TokenSet {
    /// Identity tokens: `object`, `variant`, `label` and their lower-case forms.
    pub fn identity(target: &ObjectVariant) -> Self {
        let label = target.label();
        Self::default()
            .with("object", target.object_str())
            .with("variant", target.variant_str())
            .with("object_lower", target.object_str().to_lowercase())
            .with("variant_lower", target.variant_str().to_lowercase())
            .with("label_lower", label.to_lowercase())
            .with("label", label)
    }

    /// Adds the timestamp tokens derived from `at`.
    pub fn with_timestamps<Tz>(self, at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.with("date", at.format("%Y%m%d").to_string())
            .with("time", at.format("%H%M%S").to_string())
            .with("datetime", at.format("%Y%m%d_%H%M%S").to_string())
            .with("time_hm", at.format("%H%M").to_string())
            .with("datetime_hm", at.format("%Y%m%d %H%M").to_string())
            .with("datetime_hm_u", at.format("%Y%m%d_%H%M").to_string())
    }

    /// Adds or replaces a token.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tokens.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.tokens.get(name).map(String::as_str)
    }

    /// Substitutes every `{token}` in `template`.
    pub fn expand(&self, template: &str) -> String {
        self.try_expand(template)
            .unwrap_or_else(|| template.to_string())
    }

    fn try_expand(&self, template: &str) -> Option<String> {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next()? {
                            '}' => break,
                            '{' => return None,
                            c => name.push(c),
                        }
                    }
                    out.push_str(self.get(&name)?);
                }
                '}' => {
                    if chars.next() != Some('}') {
                        return None;
                    }
                    out.push('}');
                }
                c => out.push(c),
            }
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn tokens() -> TokenSet {
        let at = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, 9, 7, 3)
            .unwrap();
        TokenSet::identity(&ObjectVariant::parse(Some("M140_BNKA"), None)).with_timestamps(&at)
    }

    #[test]
    fn expands_identity_and_time_tokens() {
        let t = tokens();
        assert_eq!(
            t.expand("{datetime_hm_u}_{label_lower}_output.csv"),
            "20240501_0907_m140_bnka_output.csv"
        );
        assert_eq!(t.expand("{object}/{variant} {datetime_hm}"), "M140/BNKA 20240501 0907");
        assert_eq!(t.expand("{date}T{time}"), "20240501T090703");
    }

    #[test]
    fn literal_braces() {
        assert_eq!(tokens().expand("{{label}} {label}"), "{label} M140_BNKA");
    }

    #[test]
    fn unknown_or_malformed_templates_pass_through() {
        let t = tokens();
        assert_eq!(t.expand("{nope}_{label}"), "{nope}_{label}");
        assert_eq!(t.expand("{label"), "{label");
        assert_eq!(t.expand("label}"), "label}");
    }

    #[test]
    fn extra_tokens_layer_on() {
        let t = tokens().with("stage", "raw").with("ext", "md");
        assert_eq!(t.expand("report_{stage}.{ext}"), "report_raw.md");
    }
}
