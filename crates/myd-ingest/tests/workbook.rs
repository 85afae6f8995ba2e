//! Integration tests for reading workbook inputs.
//!
//! `fixtures/banks.xlsx` holds two sheets: `Info` (a single NOTE column) and
//! `Banks` (SWIFT, BANKL, NAME with two rows).

use std::path::{Path, PathBuf};

use myd_common::{column_names, text_values};
use myd_ingest::{IngestError, load_input, read_table};
use myd_model::{MetaOptions, SheetSelector, SourceSpec};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/banks.xlsx")
}

#[test]
fn first_sheet_by_default() {
    let table = read_table(&fixture(), None, None).unwrap();
    assert_eq!(table.headers, vec!["NOTE"]);
    assert_eq!(table.rows, vec![vec![Some("generated for tests".to_string())]]);
}

#[test]
fn sheet_by_name_and_position() {
    let by_name = read_table(&fixture(), None, Some(&SheetSelector::Name("Banks".to_string()))).unwrap();
    let by_index = read_table(&fixture(), None, Some(&SheetSelector::Index(1))).unwrap();
    assert_eq!(by_name, by_index);
    assert_eq!(by_name.headers, vec!["SWIFT", "BANKL", "NAME"]);
    assert_eq!(by_name.rows.len(), 2);
}

#[test]
fn numbers_read_as_plain_text() {
    let sheet = SheetSelector::Name("Banks".to_string());
    let frame = read_table(&fixture(), None, Some(&sheet))
        .unwrap()
        .into_frame()
        .unwrap();
    assert_eq!(text_values(&frame, "BANKL"), vec!["100", "200"]);
    assert_eq!(text_values(&frame, "SWIFT"), vec!["DEUTNL2A", "ABNANL2A"]);
}

#[test]
fn missing_sheet_lists_available() {
    let err = read_table(&fixture(), None, Some(&SheetSelector::Name("Addresses".to_string())))
        .unwrap_err();
    match err {
        IngestError::SheetNotFound { sheet, available, .. } => {
            assert_eq!(sheet, "Addresses");
            assert_eq!(available, "Info, Banks");
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = read_table(&fixture(), None, Some(&SheetSelector::Index(5))).unwrap_err();
    assert!(err.to_string().contains("sheet '#5' not found"));
}

#[test]
fn meta_sheet_selects_the_input_sheet() {
    let meta = MetaOptions {
        sheet: Some(SheetSelector::Name("Banks".to_string())),
        ..MetaOptions::default()
    };
    let loaded = load_input(&meta, &fixture()).unwrap();
    assert_eq!(column_names(&loaded.frame), vec!["SWIFT", "BANKL", "NAME"]);
    assert_eq!(loaded.frame.height(), 2);
}

#[test]
fn workbook_source_joins_with_csv() {
    let dir = tempfile::tempdir().unwrap();
    let cities = dir.path().join("cities.csv");
    std::fs::write(&cities, "SWIFT,CITY\nDEUTNL2A,Amsterdam\n").unwrap();

    let yaml = format!(
        "sources:\n  - name: banks\n    path: {}\n    sheet: 1\n  - name: cities\n    path: {}\njoins:\n  - right: cities\n    on: SWIFT\n",
        fixture().display(),
        cities.display()
    );
    let meta: MetaOptions = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(
        meta.sources[0],
        SourceSpec {
            name: "banks".to_string(),
            path: Some(fixture().display().to_string()),
            delimiter: None,
            sheet: Some(SheetSelector::Index(1)),
        }
    );

    let loaded = load_input(&meta, Path::new("unused.csv")).unwrap();
    assert_eq!(column_names(&loaded.frame), vec!["SWIFT", "BANKL", "NAME", "CITY"]);
    assert_eq!(text_values(&loaded.frame, "CITY"), vec!["Amsterdam", ""]);
}

#[test]
fn unreadable_workbook_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.xlsx");
    std::fs::write(&path, b"not a zip archive").unwrap();
    let err = read_table(&path, None, None).unwrap_err();
    assert!(matches!(err, IngestError::Workbook { .. }));
}
