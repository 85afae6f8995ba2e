//! End-to-end runs against a configuration tree in a temp directory.

use std::fs;
use std::path::Path;

use myd_cli::lint::{lint_target, render_issues};
use myd_cli::scaffold::{apply_scaffold, plan_scaffold};
use myd_cli::{RunOptions, run_pipeline};
use myd_config::ObjectVariant;
use myd_model::SheetSelector;
use myd_transform::ExtensionRegistry;
use tempfile::TempDir;

const BOM: &str = "\u{feff}";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(value_rules: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        let variant = root.join("config/M140/BNKA");
        fs::create_dir_all(&variant).expect("config dir");
        fs::write(
            variant.join("column_map.yaml"),
            "SWIFT: SWIFT_CODE\nBANKA: BANK_NAME\n",
        )
        .expect("column_map");
        fs::write(variant.join("value_rules.yaml"), value_rules).expect("value_rules");
        let meta = format!(
            "delimiter: ','\ndirs:\n  raw: '{raw}'\n  out: '{out}'\n  rejects: '{rejects}'\n",
            raw = root.join("data/raw").display(),
            out = root.join("data/out").display(),
            rejects = root.join("data/rejects").display(),
        );
        fs::create_dir_all(root.join("config/M140/_shared")).expect("shared dir");
        fs::write(root.join("config/M140/_shared/meta.yaml"), meta).expect("meta");
        fs::create_dir_all(root.join("data/raw")).expect("raw dir");
        fs::write(
            root.join("data/raw/bnka.csv"),
            "SWIFT,OTHER\n db bank  ,x\n,y\n",
        )
        .expect("input");
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn options(&self) -> RunOptions {
        let mut options = RunOptions::new(
            self.root().join("config"),
            ObjectVariant::parse(Some("M140"), Some("BNKA")),
        );
        options.overrides.input = Some(self.root().join("data/raw/bnka.csv"));
        options.overrides.output = Some(self.root().join("data/out/export.csv"));
        options.overrides.rejects = Some(self.root().join("data/rejects/rejects.csv"));
        options.overrides.log_dir = Some(self.root().join("logs"));
        options.quiet = true;
        options
    }
}

fn read_csv_lines(path: &Path) -> Vec<String> {
    let text = fs::read_to_string(path).expect("read csv");
    let text = text.strip_prefix(BOM).expect("utf-8-sig output");
    text.lines().map(str::to_string).collect()
}

const SWIFT_RULES: &str = "SWIFT:\n  transforms: [strip, upper]\n  max_length: 11\n  required: true\n";

#[test]
fn run_exports_valid_rows_and_rejects_the_rest() {
    let workspace = Workspace::new(SWIFT_RULES);
    let outcome = run_pipeline(&workspace.options(), &ExtensionRegistry::with_builtins())
        .expect("run");

    assert_eq!(outcome.label, "M140_BNKA");
    assert_eq!((outcome.counts.valid, outcome.counts.rejected), (1, 1));

    let export = read_csv_lines(&outcome.output);
    assert_eq!(export, vec!["SWIFT_CODE,BANK_NAME", "DB BANK,"]);

    let rejects = read_csv_lines(&outcome.rejects);
    assert!(rejects[0].starts_with("SWIFT_CODE,BANK_NAME,__run_id,__row_id"));
    assert!(rejects[0].ends_with("__errors"));
    assert_eq!(rejects.len(), 2);
    assert!(rejects[1].ends_with("SWIFT is required"));

    let log = outcome.txt_log.as_ref().expect("text log written");
    let log_text = fs::read_to_string(log).expect("read log");
    assert!(log_text.contains("Row 2: OK"));
    assert!(log_text.contains("Row 3: REJECT – SWIFT is required"));
    assert!(outcome.reports.is_empty());
}

#[test]
fn reports_cover_requested_stages() {
    let workspace = Workspace::new(SWIFT_RULES);
    let mut options = workspace.options();
    options.report = true;
    options.report_format = myd_report::ReportFormat::Both;
    options.stages = Some(vec!["raw".into(), "post".into(), "validation".into()]);
    options.txt_log = false;
    options.keep_lineage = true;

    let outcome = run_pipeline(&options, &ExtensionRegistry::with_builtins()).expect("run");
    assert_eq!(outcome.reports.len(), 6);
    assert!(outcome.reports.iter().all(|path| path.exists()));
    assert!(outcome.txt_log.is_none());

    let reasons = outcome.reject_reasons.as_ref().expect("reasons written");
    assert_eq!(
        read_csv_lines(reasons),
        vec!["reason,count", "SWIFT is required,1"]
    );

    let export = read_csv_lines(&outcome.output);
    assert!(export[0].starts_with("SWIFT_CODE,BANK_NAME,__run_id,__row_id,__ingest_ts"));
}

#[test]
fn unknown_extension_fails_before_reading_input() {
    let workspace = Workspace::new(
        "SWIFT:\n  transforms: [{custom: {module: nope, function: shout}}]\n",
    );
    let mut options = workspace.options();
    options.overrides.input = Some(workspace.root().join("missing.csv"));

    let err = run_pipeline(&options, &ExtensionRegistry::with_builtins()).expect_err("fails");
    assert!(format!("{err:#}").contains("unknown transform extension 'nope.shout'"));
    assert!(!workspace.root().join("data/out/export.csv").exists());
}

#[test]
fn duplicate_target_fails_before_export() {
    let workspace = Workspace::new(SWIFT_RULES);
    fs::write(
        workspace.root().join("config/M140/BNKA/column_map.yaml"),
        "SWIFT: CODE\nBANKA: CODE\n",
    )
    .expect("column_map");
    let err = run_pipeline(&workspace.options(), &ExtensionRegistry::with_builtins())
        .expect_err("fails");
    assert!(format!("{err:#}").contains("target column 'CODE' is mapped from both"));
    assert!(!workspace.root().join("data/out/export.csv").exists());
}

#[test]
fn sample_limits_rows() {
    let workspace = Workspace::new(SWIFT_RULES);
    let mut options = workspace.options();
    options.sample = Some(1);
    let outcome = run_pipeline(&options, &ExtensionRegistry::with_builtins()).expect("run");
    assert_eq!(outcome.counts.total, 1);
    assert_eq!(outcome.counts.rejected, 0);
}

#[test]
fn zero_sample_processes_every_row() {
    let workspace = Workspace::new(SWIFT_RULES);
    let mut options = workspace.options();
    options.sample = Some(0);
    let outcome = run_pipeline(&options, &ExtensionRegistry::with_builtins()).expect("run");
    assert_eq!(outcome.counts.total, 2);
    assert_eq!((outcome.counts.valid, outcome.counts.rejected), (1, 1));
}

#[test]
fn lint_reports_rule_problems() {
    let workspace = Workspace::new("SWIFT:\n  max_length: zero\nORT01:\n  required: true\n");
    let issues = lint_target(
        &workspace.root().join("config"),
        &ObjectVariant::parse(Some("M140_BNKA"), None),
        &ExtensionRegistry::with_builtins(),
    );
    insta::assert_snapshot!(render_issues(&issues).trim_start(), @r"
    Lint report:
     ! [E103] SWIFT: max_length is not an integer
     - [W101] value_rules column 'ORT01' is not in column_map
    ");
}

#[test]
fn scaffolded_config_lints_clean() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv = dir.path().join("header.csv");
    fs::write(&csv, "BANKS;BANKL;BANKA\nDE;1;x\n").expect("csv");
    let root = dir.path().join("config");

    let plan = plan_scaffold(&root, "M140_ADRC", Some(&csv), None).expect("plan");
    let dry = apply_scaffold(&plan, false, true).expect("dry run");
    assert_eq!(dry.len(), 4);
    assert!(!plan.base.exists());

    apply_scaffold(&plan, false, false).expect("write");
    let again = apply_scaffold(&plan, false, false).expect("rerun");
    assert!(again.iter().all(|action| action.to_string().ends_with("(exists)")));

    let issues = lint_target(
        &root,
        &ObjectVariant::parse(Some("M140"), Some("ADRC")),
        &ExtensionRegistry::with_builtins(),
    );
    assert!(issues.is_empty(), "{issues:?}");
}

#[test]
fn workbook_scaffold_runs_end_to_end() {
    let workspace = Workspace::new(SWIFT_RULES);
    let root = workspace.root();
    let workbook = Path::new(env!("CARGO_MANIFEST_DIR")).join("../myd-ingest/tests/fixtures/banks.xlsx");
    let sheet = SheetSelector::Name("Banks".to_string());

    let plan = plan_scaffold(&root.join("config"), "M140/BNKB", Some(&workbook), Some(&sheet))
        .expect("plan");
    assert_eq!(plan.files[0].1, "# column_map.yaml\n\"SWIFT\": \"SWIFT\"\n\"BANKL\": \"BANKL\"\n\"NAME\": \"NAME\"\n");
    assert!(plan.files[3].1.contains("input_file: \"M140_BNKB_raw.xlsx\""));
    apply_scaffold(&plan, false, false).expect("write");

    let input = root.join("data/raw/M140_BNKB_raw.xlsx");
    fs::copy(&workbook, &input).expect("copy workbook");
    let mut options = workspace.options();
    options.target = ObjectVariant::parse(Some("M140"), Some("BNKB"));
    options.overrides.input = Some(input);

    let outcome = run_pipeline(&options, &ExtensionRegistry::with_builtins()).expect("run");
    assert_eq!(outcome.counts.total, 2);
    let export = read_csv_lines(&outcome.output);
    assert_eq!(export[..2], ["SWIFT,BANKL,NAME", "DEUTNL2A,100,Deutsche Bank"]);
}
