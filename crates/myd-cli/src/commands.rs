use std::path::Path;

use anyhow::{Result, bail};
use myd_cli::lint::{discover_targets, lint_exit_code, lint_target, render_issues};
use myd_cli::pipeline::{parse_stage_list, run_pipeline};
use myd_cli::runlist::load_manifest;
use myd_cli::scaffold::{apply_scaffold, plan_scaffold};
use myd_cli::types::{ExitPolicy, RunOptions};
use myd_config::{ObjectVariant, PathOverrides};
use myd_model::SheetSelector;
use myd_report::ReportFormat;
use myd_transform::ExtensionRegistry;
use tracing::{error, info};

use crate::cli::{BatchArgs, LintArgs, RunArgs, ScaffoldArgs};
use crate::summary::print_summary;

pub fn run_command(args: &RunArgs, quiet: bool, registry: &ExtensionRegistry) -> Result<i32> {
    let target = ObjectVariant::parse(args.target.object.as_deref(), args.target.variant.as_deref());
    if target.object.is_none() {
        bail!("run needs --object");
    }
    let mut options = RunOptions::new(&args.target.config, target);
    options.overrides = PathOverrides {
        input: args.input.clone(),
        output: args.output.clone(),
        rejects: args.rejects.clone(),
        log_dir: args.logdir.clone(),
    };
    options.sample = args.sample;
    options.report = args.report;
    options.report_format = args.report_format.into();
    options.stages = args.reports.as_deref().map(parse_stage_list);
    options.trace_config = args.trace_config;
    options.txt_log = !args.no_txt_log;
    options.quiet = quiet;
    options.lineage = !args.no_lineage;
    options.keep_lineage = args.keep_lineage;
    options.encoding_out = args.encoding_out.clone();
    options.encoding_rejects = args.encoding_rejects.clone();
    let mut policy = ExitPolicy {
        fail_on_rejects: args.fail_on_rejects,
        fail_on_zero_valid: args.fail_on_zero_valid,
    };
    let mut lint = args.lint;
    let mut strict = args.strict;
    if args.ci {
        options.quiet = true;
        options.txt_log = false;
        options.report = true;
        options.report_format = ReportFormat::Html;
        policy.fail_on_rejects = true;
        policy.fail_on_zero_valid = true;
        lint = true;
        strict = true;
    }

    if lint {
        let issues = lint_target(&options.config_root, &options.target, registry);
        if !options.quiet || !issues.is_empty() {
            print!("{}", render_issues(&issues));
        }
        if lint_exit_code(&issues, strict) != 0 {
            return Ok(1);
        }
    }

    let outcome = run_pipeline(&options, registry)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_summary(&outcome);
    }
    Ok(policy.exit_code(&outcome.counts))
}

pub fn lint_command(args: &LintArgs, registry: &ExtensionRegistry) -> Result<i32> {
    let root = &args.target.config;
    if args.all {
        let mut exit_code = 0;
        for target in discover_targets(root)? {
            println!("== LINT {} ==", target.label());
            exit_code = exit_code.max(lint_one(root, &target, args.strict, registry));
        }
        return Ok(exit_code);
    }
    let target = ObjectVariant::parse(args.target.object.as_deref(), args.target.variant.as_deref());
    if target.object.is_none() {
        bail!("lint needs --object or --all");
    }
    Ok(lint_one(root, &target, args.strict, registry))
}

fn lint_one(root: &Path, target: &ObjectVariant, strict: bool, registry: &ExtensionRegistry) -> i32 {
    let issues = lint_target(root, target, registry);
    print!("{}", render_issues(&issues));
    lint_exit_code(&issues, strict)
}

pub fn batch_command(args: &BatchArgs, quiet: bool, registry: &ExtensionRegistry) -> Result<i32> {
    let manifest = load_manifest(&args.manifest)?;
    info!(jobs = manifest.jobs.len(), manifest = %args.manifest.display(), "batch started");
    let mut base = RunOptions::new(&args.config, ObjectVariant::default());
    base.sample = args.sample;
    base.report = args.report;
    base.report_format = args.report_format.into();
    base.trace_config = args.trace_config;
    base.txt_log = !args.no_txt_log;
    base.quiet = quiet;
    let policy = ExitPolicy {
        fail_on_rejects: args.fail_on_rejects,
        fail_on_zero_valid: args.fail_on_zero_valid,
    };

    let mut exit_code = 0;
    for job in &manifest.jobs {
        let target = job.target();
        if args.lint {
            println!("=== LINT {} ===", target.label());
            exit_code = exit_code.max(lint_one(&args.config, &target, args.strict, registry));
            continue;
        }
        println!("\n=== RUN {} ===", target.label());
        let result = job
            .run_options(&base)
            .and_then(|options| run_pipeline(&options, registry));
        match result {
            Ok(outcome) => {
                print_summary(&outcome);
                exit_code = exit_code.max(policy.exit_code(&outcome.counts));
            }
            Err(err) => {
                error!(label = %target.label(), error = %format!("{err:#}"), "job failed");
                eprintln!("error: {err:#}");
                exit_code = 1;
            }
        }
    }
    Ok(exit_code)
}

pub fn scaffold_command(args: &ScaffoldArgs) -> Result<i32> {
    let sheet = args.sheet.as_deref().map(SheetSelector::from_arg);
    let plan = plan_scaffold(&args.config, &args.name, args.from.as_deref(), sheet.as_ref())?;
    println!("Scaffold → {}", plan.base.display());
    for action in apply_scaffold(&plan, args.force, args.dry_run)? {
        println!("{action}");
    }
    if args.dry_run {
        println!("Done. (dry-run)");
    } else {
        println!("Done.");
    }
    Ok(0)
}
