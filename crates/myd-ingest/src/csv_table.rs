//! Delimited text reading.

use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::table::{RawTable, unique_headers};

/// Delimiters considered by auto-detection, in tie-break order.
pub const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Decodes raw bytes: UTF-8 (BOM stripped) or Windows-1252 when not valid UTF-8.
pub fn decode_bytes(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!("input is not valid UTF-8, decoding as windows-1252");
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
    }
}

/// Picks the candidate delimiter occurring most often in the first line.
///
/// Falls back to a comma.
pub fn detect_delimiter(text: &str) -> u8 {
    let first_line = text.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
    let mut best = b',';
    let mut best_count = 0;
    for candidate in CANDIDATE_DELIMITERS {
        let count = first_line.bytes().filter(|b| *b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Parses a configured delimiter. Accepts a single ASCII character, `\t` or `tab`.
pub fn parse_delimiter(value: &str) -> Result<u8> {
    match value {
        "\\t" | "tab" | "TAB" => return Ok(b'\t'),
        _ => {}
    }
    let mut bytes = value.bytes();
    match (bytes.next(), bytes.next()) {
        (Some(b), None) if b.is_ascii() => Ok(b),
        _ => Err(IngestError::InvalidDelimiter {
            value: value.to_string(),
        }),
    }
}

/// Reads a CSV file, detecting the delimiter when `delimiter` is `None`.
pub fn read_csv_table(path: &Path, delimiter: Option<u8>) -> Result<RawTable> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let text = decode_bytes(&bytes);
    parse_csv_text(&text, delimiter, path)
}

/// Parses CSV text. The first non-empty record is the header.
///
/// `origin` only labels parse errors.
pub fn parse_csv_text(text: &str, delimiter: Option<u8>, origin: &Path) -> Result<RawTable> {
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(text));
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|err| IngestError::CsvParse {
            path: origin.to_path_buf(),
            message: format!("record {}: {err}", line + 1),
        })?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        match &headers {
            None => headers = Some(unique_headers(record.iter())),
            Some(names) => {
                if record.len() > names.len() {
                    debug!(line = line + 1, extra = record.len() - names.len(), "extra cells dropped");
                }
                let row = (0..names.len())
                    .map(|idx| record.get(idx).filter(|cell| !cell.is_empty()).map(str::to_string))
                    .collect();
                rows.push(row);
            }
        }
    }
    Ok(RawTable {
        headers: headers.unwrap_or_default(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str, delimiter: Option<u8>) -> RawTable {
        parse_csv_text(text, delimiter, Path::new("test.csv")).unwrap()
    }

    #[test]
    fn detects_semicolon() {
        assert_eq!(detect_delimiter("A;B;C\n1;2;3\n"), b';');
        assert_eq!(detect_delimiter("A\tB\n"), b'\t');
        assert_eq!(detect_delimiter("ONLY\n"), b',');
    }

    #[test]
    fn parses_delimiter_settings() {
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert_eq!(parse_delimiter("\t").unwrap(), b'\t');
        assert!(parse_delimiter(";;").is_err());
    }

    #[test]
    fn empty_cells_are_null_and_blank_rows_skipped() {
        let table = parse(" A ,B\n1,\n,\n x ,2,extra\n", None);
        assert_eq!(table.headers, vec!["A", "B"]);
        assert_eq!(
            table.rows,
            vec![
                vec![Some("1".to_string()), None],
                vec![Some(" x ".to_string()), Some("2".to_string())],
            ]
        );
    }

    #[test]
    fn short_rows_are_padded() {
        let table = parse("A,B,C\n1\n", Some(b','));
        assert_eq!(table.rows, vec![vec![Some("1".to_string()), None, None]]);
    }

    #[test]
    fn duplicate_headers_get_suffixes() {
        let table = parse("A,A,B,A\n", None);
        assert_eq!(table.headers, vec!["A", "A.1", "B", "A.2"]);
    }

    #[test]
    fn decodes_bom_and_windows_1252() {
        assert_eq!(decode_bytes(b"\xEF\xBB\xBFA;B"), "A;B");
        assert_eq!(decode_bytes(b"M\xFCnchen"), "München");
    }

    #[test]
    fn table_into_frame() {
        let table = parse("A;B\n1;x\n2;\n", None);
        let df = table.into_frame().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(myd_common::text_values(&df, "B"), vec!["x", ""]);
    }
}
