//! Static checks over a merged configuration.
//!
//! Lint works on the raw merged trees rather than the typed rules so that it
//! can report every problem in one pass, including the ones that would make
//! typed parsing fail.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use myd_config::{LayeredConfig, ObjectVariant, SHARED_DIR, load_layered, parse};
use myd_model::{ConfigMap, ConfigNode, MetaOptions, TransformStep};
use myd_transform::ExtensionRegistry;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
}

impl LintIssue {
    fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    fn warning(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.severity {
            Severity::Error => '!',
            Severity::Warning => '-',
        };
        write!(f, " {marker} [{}] {}", self.code, self.message)
    }
}

/// Loads the layers for `target` and lints them.
pub fn lint_target(root: &Path, target: &ObjectVariant, registry: &ExtensionRegistry) -> Vec<LintIssue> {
    match load_layered(root, target) {
        Ok(layered) => lint_layered(&layered, registry),
        Err(err) => vec![LintIssue::error("E001", format!("configuration failed to load: {err}"))],
    }
}

/// Lints already merged configuration trees. Issues come back sorted.
pub fn lint_layered(layered: &LayeredConfig, registry: &ExtensionRegistry) -> Vec<LintIssue> {
    let column_map = match layered.column_map.as_map() {
        Some(map) if !map.is_empty() => map,
        _ => return vec![LintIssue::error("E001", "column_map is missing or empty")],
    };
    let mut issues = Vec::new();
    check_targets(column_map, &mut issues);
    check_value_map(&layered.value_map, column_map, &mut issues);
    check_value_rules(&layered.value_rules, column_map, registry, &mut issues);
    check_meta(&layered.meta, &mut issues);

    let has_error = issues.iter().any(|i| i.severity == Severity::Error);
    if !has_error && let Err(err) = parse::parse_value_rules(&layered.value_rules) {
        issues.push(LintIssue::error("E001", format!("value_rules rejected: {err}")));
    }
    sort_issues(&mut issues);
    issues
}

pub fn sort_issues(issues: &mut [LintIssue]) {
    issues.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.code.cmp(b.code))
            .then_with(|| a.message.cmp(&b.message))
    });
}

/// `Lint: no issues found.` or the `Lint report:` block.
pub fn render_issues(issues: &[LintIssue]) -> String {
    if issues.is_empty() {
        return "Lint: no issues found.\n".to_string();
    }
    let mut out = String::from("\nLint report:\n");
    for issue in issues {
        out.push_str(&issue.to_string());
        out.push('\n');
    }
    out
}

/// 1 on any error, or on any issue when `strict`.
pub fn lint_exit_code(issues: &[LintIssue], strict: bool) -> i32 {
    let failing = issues
        .iter()
        .any(|issue| strict || issue.severity == Severity::Error);
    i32::from(failing)
}

/// Every object/variant configured under `root`, sorted.
///
/// An object with variant directories yields one target per variant;
/// otherwise the object itself is the target.
pub fn discover_targets(root: &Path) -> Result<Vec<ObjectVariant>> {
    let mut targets = Vec::new();
    for object in sorted_subdirs(root)? {
        let variants = sorted_subdirs(&root.join(&object))?;
        if variants.is_empty() {
            targets.push(ObjectVariant::new(Some(object.as_str()), None));
        } else {
            targets.extend(
                variants
                    .iter()
                    .map(|variant| ObjectVariant::new(Some(object.as_str()), Some(variant.as_str()))),
            );
        }
    }
    Ok(targets)
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<String>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read config directory {}", dir.display()))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read config directory {}", dir.display()))?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name != SHARED_DIR && !name.starts_with('.') {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

fn check_targets(column_map: &ConfigMap, issues: &mut Vec<LintIssue>) {
    let mut sources_by_target: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for (source, target) in column_map {
        let target = target
            .scalar_string()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| source.clone());
        sources_by_target.entry(target).or_default().push(source);
    }
    for (target, sources) in sources_by_target {
        if sources.len() > 1 {
            issues.push(LintIssue::error(
                "E002",
                format!("target column '{target}' is mapped from {}", sources.join(", ")),
            ));
        }
    }
}

fn check_value_map(node: &ConfigNode, column_map: &ConfigMap, issues: &mut Vec<LintIssue>) {
    let Some(value_map) = node.as_map() else {
        if !node.is_null() {
            issues.push(LintIssue::error("E202", format!("value_map must be a mapping, found {}", node.kind())));
        }
        return;
    };
    for (column, entries) in value_map {
        if !column_map.contains_key(column) {
            issues.push(LintIssue::warning(
                "W201",
                format!("value_map column '{column}' is not in column_map"),
            ));
        }
        let Some(entries) = entries.as_map() else {
            issues.push(LintIssue::error(
                "E202",
                format!("value_map for '{column}' must be a mapping, found {}", entries.kind()),
            ));
            continue;
        };
        for (raw, replacement) in entries {
            if replacement.as_str().is_none() {
                issues.push(LintIssue::error(
                    "E202",
                    format!(
                        "value_map for '{column}' maps '{raw}' to a {} instead of a string",
                        replacement.kind()
                    ),
                ));
            }
        }
    }
}

fn check_value_rules(
    node: &ConfigNode,
    column_map: &ConfigMap,
    registry: &ExtensionRegistry,
    issues: &mut Vec<LintIssue>,
) {
    let Some(rules) = node.as_map() else {
        return;
    };
    for (column, spec) in rules {
        if !column_map.contains_key(column) {
            issues.push(LintIssue::warning(
                "W101",
                format!("value_rules column '{column}' is not in column_map"),
            ));
        }
        if let Some(max_length) = spec.get("max_length").filter(|n| !n.is_null()) {
            match max_length.as_i64() {
                None => issues.push(LintIssue::error(
                    "E103",
                    format!("{column}: max_length is not an integer"),
                )),
                Some(n) if n <= 0 => issues.push(LintIssue::error(
                    "E103",
                    format!("{column}: max_length must be greater than 0"),
                )),
                Some(_) => {}
            }
        }
        if let Some(pattern) = spec.get("pattern").and_then(ConfigNode::scalar_string)
            && !pattern.is_empty()
            && let Err(err) = Regex::new(&format!("^(?:{pattern})$"))
        {
            issues.push(LintIssue::error(
                "E102",
                format!("{column}: invalid pattern '{pattern}': {err}"),
            ));
        }
        if let Some(steps) = spec.get("transforms").filter(|n| !n.is_null()) {
            check_steps(column, steps, registry, issues);
        }
        if let Some(custom) = spec.get("custom").filter(|n| !n.is_null()) {
            match parse::parse_extension(column, custom) {
                Ok(reference) => {
                    let id = reference.id();
                    if !registry.has_validator(&id) {
                        issues.push(LintIssue::error(
                            "E104",
                            format!("{column}: custom validator '{id}' is not registered"),
                        ));
                    }
                }
                Err(_) => issues.push(LintIssue::warning(
                    "W105",
                    format!("{column}: custom requires module and function"),
                )),
            }
        }
    }
}

fn check_steps(
    column: &str,
    steps: &ConfigNode,
    registry: &ExtensionRegistry,
    issues: &mut Vec<LintIssue>,
) {
    let Some(steps) = steps.as_list() else {
        issues.push(LintIssue::warning(
            "W104",
            format!("{column}: transforms must be a list"),
        ));
        return;
    };
    let known: HashSet<&str> = TransformStep::KNOWN.iter().copied().collect();
    for step in steps {
        let (name, args) = match step {
            ConfigNode::Str(name) => (name.as_str(), None),
            ConfigNode::Map(map) if map.len() == 1 => match map.first() {
                Some((name, args)) => (name.as_str(), Some(args)),
                None => continue,
            },
            other => {
                issues.push(LintIssue::warning(
                    "W104",
                    format!("{column}: unrecognized transform step ({})", other.kind()),
                ));
                continue;
            }
        };
        if !known.contains(name) {
            issues.push(LintIssue::warning(
                "W104",
                format!("{column}: unknown transform '{name}'"),
            ));
            continue;
        }
        if name != "custom" {
            continue;
        }
        let node = args.cloned().unwrap_or_default();
        match parse::parse_extension(column, &node) {
            Ok(reference) => {
                let id = reference.id();
                if !registry.has_transform(&id) {
                    issues.push(LintIssue::error(
                        "E104",
                        format!("{column}: custom transform '{id}' is not registered"),
                    ));
                }
            }
            Err(_) => issues.push(LintIssue::warning(
                "W105",
                format!("{column}: custom transform requires module and function"),
            )),
        }
    }
}

fn check_meta(node: &ConfigNode, issues: &mut Vec<LintIssue>) {
    let meta: MetaOptions = match parse::parse_meta(node) {
        Ok(meta) => meta,
        Err(err) => {
            issues.push(LintIssue::error("E001", format!("meta rejected: {err}")));
            return;
        }
    };
    let names: HashSet<&str> = meta.sources.iter().map(|s| s.name.as_str()).collect();
    if !meta.joins.is_empty() && meta.sources.is_empty() {
        issues.push(LintIssue::warning("W303", "joins are declared but no sources"));
    }
    for (idx, join) in meta.joins.iter().enumerate() {
        let position = idx + 1;
        match join.right.as_deref() {
            None => issues.push(LintIssue::error(
                "E301",
                format!("join #{position} has no right source"),
            )),
            Some(right) if !meta.sources.is_empty() && !names.contains(right) => {
                issues.push(LintIssue::error(
                    "E301",
                    format!("join #{position} references unknown source '{right}'"),
                ));
            }
            Some(_) => {}
        }
        if join.key_columns().is_none() {
            issues.push(LintIssue::error(
                "E302",
                format!("join #{position} needs 'on' or both 'left_on' and 'right_on'"),
            ));
        }
    }
    for source in &meta.sources {
        if source.path.as_deref().is_none_or(|p| p.trim().is_empty()) {
            issues.push(LintIssue::warning(
                "W304",
                format!("source '{}' has no path", source.name),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use myd_config::parse_yaml;

    fn layered(column_map: &str, value_map: &str, value_rules: &str, meta: &str) -> LayeredConfig {
        let node = |text: &str| parse_yaml(text, Path::new("test.yaml")).expect("yaml");
        LayeredConfig {
            root: "config".into(),
            target: ObjectVariant::parse(Some("M140"), Some("BNKA")),
            layers: Vec::new(),
            files: Vec::new(),
            column_map: node(column_map),
            value_map: node(value_map),
            value_rules: node(value_rules),
            meta: node(meta),
        }
    }

    fn codes(issues: &[LintIssue]) -> Vec<&'static str> {
        issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn empty_column_map_is_fatal() {
        let config = layered("{}", "{}", "{}", "{}");
        let issues = lint_layered(&config, &ExtensionRegistry::with_builtins());
        assert_eq!(codes(&issues), vec!["E001"]);
        assert_eq!(lint_exit_code(&issues, false), 1);
    }

    #[test]
    fn rule_problems_are_reported_together() {
        let config = layered(
            "BANKS: LAND\nBANKL: LAND\nSWIFT: SWIFT_CODE\n",
            "ORT01:\n  A: 1\n",
            concat!(
                "SWIFT:\n  max_length: -1\n  pattern: '[A-Z'\n",
                "  transforms: [strip, shout, {custom: {module: nope, function: x}}]\n",
                "IBAN:\n  custom: {module: checks}\n",
            ),
            "{}",
        );
        let issues = lint_layered(&config, &ExtensionRegistry::with_builtins());
        assert_eq!(
            codes(&issues),
            vec!["E002", "E102", "E103", "E104", "E202", "W101", "W104", "W105", "W201"]
        );
    }

    #[test]
    fn join_checks() {
        let config = layered(
            "A: A\n",
            "{}",
            "{}",
            "sources:\n  - name: base\n    path: a.csv\n  - name: addr\njoins:\n  - right: other\n  - right: addr\n",
        );
        let issues = lint_layered(&config, &ExtensionRegistry::with_builtins());
        assert_eq!(codes(&issues), vec!["E301", "E302", "E302", "W304"]);
    }

    #[test]
    fn warnings_only_fail_when_strict() {
        let config = layered("A: A\n", "B:\n  x: y\n", "{}", "{}");
        let issues = lint_layered(&config, &ExtensionRegistry::with_builtins());
        assert_eq!(codes(&issues), vec!["W201"]);
        assert_eq!(lint_exit_code(&issues, false), 0);
        assert_eq!(lint_exit_code(&issues, true), 1);
        assert_eq!(
            render_issues(&issues),
            "\nLint report:\n - [W201] value_map column 'B' is not in column_map\n"
        );
        assert_eq!(render_issues(&[]), "Lint: no issues found.\n");
    }

    #[test]
    fn builtin_extensions_pass() {
        let config = layered(
            "IBAN: IBAN\n",
            "{}",
            "IBAN:\n  transforms: [{custom: {module: text, function: collapse_ws}}]\n  custom: {module: checks, function: iban}\n",
            "{}",
        );
        let issues = lint_layered(&config, &ExtensionRegistry::with_builtins());
        assert!(issues.is_empty(), "{issues:?}");
    }
}
