//! One end-to-end run: resolve, ingest, transform, validate, export, report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use myd_config::{
    ArtifactPaths, EffectiveConfig, RunContext, TokenSet, iso_timestamp, load_layered,
};
use myd_ingest::load_input;
use myd_model::{EncodingOptions, NamingOptions, RowErrors, RunCounts};
use myd_report::{
    ReportFormat, Stage, StageReport, TextEncoding, TextLogSummary, export_frame, reject_frame,
    render_text_log, write_csv, write_reject_reasons, write_stage_report, write_text,
};
use myd_transform::{
    ExtensionRegistry, Sanitizer, TransformPlan, apply_value_map, detect_mojibake,
    ensure_columns, ingest_timestamp, stamp_lineage,
};
use myd_validate::{Partition, RuleSet, partition};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, warn};

use crate::progress::Progress;
use crate::types::{RunOptions, RunOutcome};

/// Values scanned for mojibake after ingest.
const MOJIBAKE_SCAN_LIMIT: usize = 1000;

/// Runs the pipeline for one object/variant.
///
/// Configuration errors, invalid patterns and unknown extensions fail the
/// run before the input is read.
pub fn run_pipeline(options: &RunOptions, registry: &ExtensionRegistry) -> Result<RunOutcome> {
    let label = options.target.label();
    let span = info_span!("run", label = %label);
    let _guard = span.enter();
    let progress = Progress::new(options.quiet);

    let layered = load_layered(&options.config_root, &options.target)
        .with_context(|| format!("load configuration for {label}"))?;
    if options.trace_config {
        print!("{}", layered.trace());
    }
    let config = EffectiveConfig::from_layered(&layered)
        .with_context(|| format!("resolve configuration for {label}"))?;
    let meta = &config.meta;

    let plan = TransformPlan::compile(&config.value_rules, registry)
        .context("compile transforms")?;
    let rule_set = RuleSet::compile(&config.value_rules, registry).context("compile value rules")?;
    debug!(
        transforms = plan.columns().count(),
        checks = rule_set.columns().len(),
        "rules compiled"
    );

    let ctx = RunContext::new(options.target.clone(), &meta.lineage.tz);
    let tokens = ctx.tokens();
    let paths = ArtifactPaths::resolve(meta, &tokens, &options.overrides);
    paths.create_dirs().context("create working directories")?;

    let mut df = info_span!("ingest").in_scope(|| -> Result<DataFrame> {
        let loaded = load_input(meta, &paths.input)
            .with_context(|| format!("load input {}", paths.input.display()))?;
        let mut df = loaded.frame;
        if let Some(text) = &meta.text {
            let sanitizer = Sanitizer::from_options(text);
            if !sanitizer.is_noop() {
                let cleaned = sanitizer.apply(&mut df).context("sanitize text")?;
                debug!(columns = cleaned, "text sanitized");
            }
        }
        if options.lineage {
            let ingest_ts = ingest_timestamp(Some(&loaded.origin), &ctx);
            stamp_lineage(&mut df, &ctx, &meta.lineage, &ingest_ts).context("stamp lineage")?;
        }
        Ok(df)
    })?;

    if let Some(hit) = detect_mojibake(&df, MOJIBAKE_SCAN_LIMIT) {
        warn!(column = %hit.column, value = %hit.value, "possible mojibake in input");
        progress.warn(&format!(
            "Possible encoding damage in column '{}': {:?}",
            hit.column, hit.value
        ));
    }
    progress.step("A. Rows loaded", &df.height().to_string());

    if let Some(limit) = options.sample.filter(|n| *n > 0) {
        df = df.head(Some(limit));
        progress.step("Sample", &format!("first {} rows", df.height()));
    }

    let stages = if options.report {
        resolve_stages(options.stages.as_deref(), &meta.reports.stages)
    } else {
        Vec::new()
    };
    let mut reporter = Reporter {
        label: &label,
        ctx: &ctx,
        tokens: &tokens,
        paths: &paths,
        naming: &meta.naming,
        encodings: &meta.encoding,
        format: options.report_format,
        preferred: config.column_map.keys().cloned().collect(),
        written: Vec::new(),
    };

    let raw = df.clone();
    if stages.contains(&Stage::Raw) {
        reporter.write(&raw, Stage::Raw, None)?;
    }

    info_span!("transform").in_scope(|| -> Result<()> {
        apply_value_map(&mut df, &config.value_map).context("apply value maps")?;
        ensure_columns(&mut df, config.column_map.keys().map(String::as_str))
            .context("add missing source columns")?;
        plan.apply(&mut df).context("apply transforms")?;
        Ok(())
    })?;
    progress.step("B. Value maps and transforms", "");

    if stages.contains(&Stage::Post) {
        reporter.write(&df, Stage::Post, Some(&raw))?;
    }

    let (errors, split) = info_span!("validate").in_scope(|| -> Result<(RowErrors, Partition)> {
        let errors = rule_set.evaluate(&df);
        let split = partition(&df, &errors).context("partition rows")?;
        Ok((errors, split))
    })?;
    let counts = RunCounts::new(split.valid_count(), split.rejected_count());
    info!(valid = counts.valid, rejected = counts.rejected, "rows validated");
    progress.step(
        "C. Validation",
        &format!("valid {} | rejected {}", counts.valid, counts.rejected),
    );

    info_span!("export").in_scope(|| -> Result<()> {
        let keep_lineage = options.keep_lineage || meta.lineage.keep_in_export;
        let exported = export_frame(&split.valid, &config.column_map, keep_lineage)
            .context("build export")?;
        let out_encoding = resolve_encoding(options.encoding_out.as_deref(), meta.encoding.output())?;
        write_csv(&paths.output, &exported, out_encoding)
            .with_context(|| format!("write export {}", paths.output.display()))?;

        let rejects = reject_frame(&split.rejected, &config.column_map).context("build rejects")?;
        let reject_encoding =
            resolve_encoding(options.encoding_rejects.as_deref(), meta.encoding.rejects())?;
        write_csv(&paths.rejects, &rejects, reject_encoding)
            .with_context(|| format!("write rejects {}", paths.rejects.display()))?;
        Ok(())
    })?;
    progress.step("D. Export", &paths.output.display().to_string());
    progress.step("E. Rejects", &paths.rejects.display().to_string());

    let txt_log = if options.txt_log {
        let path = paths.log_dir.join(tokens.expand(meta.naming.log_pattern()));
        let summary = TextLogSummary {
            label: label.clone(),
            counts,
            export: paths.output.clone(),
            rejects: paths.rejects.clone(),
        };
        let encoding = TextEncoding::parse(meta.encoding.log_txt())?;
        write_text(&path, &render_text_log(&summary, &errors), encoding)
            .with_context(|| format!("write log {}", path.display()))?;
        progress.step("F. Log", &path.display().to_string());
        Some(path)
    } else {
        None
    };

    let mut reject_reasons = None;
    if stages.contains(&Stage::Validation) {
        reporter.write(&split.valid, Stage::Validation, None)?;
        let path = paths.log_dir.join(tokens.expand(NamingOptions::REJECT_REASONS));
        let encoding = TextEncoding::parse(meta.encoding.reports_csv())?;
        if write_reject_reasons(&path, &split.rejected, encoding)
            .with_context(|| format!("write reject reasons {}", path.display()))?
        {
            reject_reasons = Some(path);
        }
    }
    let reports = reporter.written;
    if !reports.is_empty() {
        progress.step("G. Reports", &reports.len().to_string());
    }

    Ok(RunOutcome {
        label,
        run_id: ctx.run_id(),
        counts,
        input: paths.input.clone(),
        output: paths.output.clone(),
        rejects: paths.rejects.clone(),
        txt_log,
        reports,
        reject_reasons,
    })
}

/// Command-line stages win over `meta.reports.stages`; unknown names are
/// skipped with a warning.
pub fn resolve_stages(cli: Option<&[String]>, configured: &[String]) -> Vec<Stage> {
    let names = match cli {
        Some(names) if !names.is_empty() => names,
        _ if !configured.is_empty() => configured,
        _ => return Stage::DEFAULT.to_vec(),
    };
    let mut stages = Vec::new();
    for name in names {
        match Stage::parse(name) {
            Some(stage) if !stages.contains(&stage) => stages.push(stage),
            Some(_) => {}
            None => warn!(stage = %name, "unknown report stage, skipping"),
        }
    }
    stages
}

/// Splits a `raw,post` style list.
pub fn parse_stage_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn resolve_encoding(cli: Option<&str>, configured: &str) -> Result<TextEncoding> {
    let label = cli.unwrap_or(configured);
    TextEncoding::parse(label).with_context(|| format!("resolve encoding '{label}'"))
}

struct Reporter<'a> {
    label: &'a str,
    ctx: &'a RunContext,
    tokens: &'a TokenSet,
    paths: &'a ArtifactPaths,
    naming: &'a NamingOptions,
    encodings: &'a EncodingOptions,
    format: ReportFormat,
    preferred: Vec<String>,
    written: Vec<PathBuf>,
}

impl Reporter<'_> {
    fn write(&mut self, df: &DataFrame, stage: Stage, baseline: Option<&DataFrame>) -> Result<()> {
        let generated = iso_timestamp(&self.ctx.now());
        let report = StageReport::build(df, &self.preferred, self.label, stage, &generated, baseline)
            .with_context(|| format!("profile {stage} stage"))?;
        let files = write_stage_report(
            &report,
            self.format,
            &self.paths.log_dir,
            self.tokens,
            self.naming.report_pattern(),
            self.encodings,
        )
        .with_context(|| format!("write {stage} report"))?;
        self.written.extend(files);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_prefer_command_line() {
        let cli = vec!["post".to_string(), "bogus".to_string(), "post".to_string()];
        let configured = vec!["raw".to_string()];
        assert_eq!(resolve_stages(Some(cli.as_slice()), &configured), vec![Stage::Post]);
        assert_eq!(resolve_stages(None, &configured), vec![Stage::Raw]);
        let empty: Vec<String> = Vec::new();
        assert_eq!(resolve_stages(Some(empty.as_slice()), &[]), Stage::DEFAULT.to_vec());
        assert_eq!(resolve_stages(None, &[]), Stage::DEFAULT.to_vec());
    }

    #[test]
    fn stage_list_splits_on_commas() {
        assert_eq!(parse_stage_list(" raw, ,validation "), vec!["raw", "validation"]);
    }
}
