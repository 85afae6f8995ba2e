//! Stage reports rendered from small frames.

use chrono::{TimeZone, Utc};
use myd_common::string_frame;
use myd_config::{ObjectVariant, RunContext, resolve_timezone};
use myd_model::EncodingOptions;
use myd_report::{ReportFormat, Stage, StageReport, render_markdown, write_stage_report};
use polars::prelude::DataFrame;

fn frame(swift: &[Option<&str>], land: &[Option<&str>]) -> DataFrame {
    let owned = |values: &[Option<&str>]| values.iter().map(|v| v.map(str::to_string)).collect();
    string_frame(vec![
        ("LAND".to_string(), owned(land)),
        ("SWIFT".to_string(), owned(swift)),
    ])
    .unwrap()
}

#[test]
fn post_report_markdown() {
    let raw = frame(&[Some(" db bank  "), Some("")], &[Some("NL"), None]);
    let post = frame(&[Some("DB BANK"), Some("")], &[Some("NL"), None]);
    let report = StageReport::build(
        &post,
        &["SWIFT".to_string()],
        "M140_BNKA",
        Stage::Post,
        "2024-01-15T09:30:00+01:00",
        Some(&raw),
    )
    .unwrap();

    insta::assert_snapshot!(render_markdown(&report), @r"
    # Data Report – M140_BNKA (post)
    _Generated: 2024-01-15T09:30:00+01:00_

    Total rows: **2**

    ## SWIFT
    - non-null: **2** / 2  |  null: **0**  |  empty (after strip): **1**
    - unique: **2**  |  len(min/max): **0 / 7**

    | value | count |
    |---|---:|
    | `` | 1 |
    | `DB BANK` | 1 |

    ## LAND
    - non-null: **1** / 2  |  null: **1**  |  empty (after strip): **1**
    - unique: **1**  |  len(min/max): **0 / 2**

    | value | count |
    |---|---:|
    | `(null)` | 1 |
    | `NL` | 1 |


    ### Delta vs raw

    | column | changed | unchanged |
    |---|---:|---:|
    | LAND | 0 | 2 |
    | SWIFT | 1 | 1 |
    ");
}

#[test]
fn writes_both_formats_to_log_dir() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = RunContext::at(
        ObjectVariant::parse(Some("M140"), Some("BNKA")),
        resolve_timezone("UTC"),
        Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap(),
    );
    let df = frame(&[Some("X")], &[Some("NL")]);
    let report = StageReport::build(&df, &[], &ctx.label(), Stage::Raw, "now", None).unwrap();
    let written = write_stage_report(
        &report,
        ReportFormat::Both,
        dir.path(),
        &ctx.tokens(),
        "{datetime_hm_u}_{label_lower}_report_{stage}.{ext}",
        &EncodingOptions::default(),
    )
    .unwrap();
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "20240115_0830_m140_bnka_report_raw.md",
            "20240115_0830_m140_bnka_report_raw.html"
        ]
    );
    let bytes = std::fs::read(&written[0]).unwrap();
    assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
}
