//! Output encodings by label.

use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};

use crate::error::{ReportError, Result};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// A resolved output encoding.
///
/// `utf-8-sig` is UTF-8 preceded by a byte-order mark. Every other label is
/// looked up as a WHATWG label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding {
    encoding: &'static Encoding,
    bom: bool,
}

impl TextEncoding {
    pub const UTF8_SIG: Self = Self {
        encoding: UTF_8,
        bom: true,
    };

    pub fn parse(label: &str) -> Result<Self> {
        let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8-sig" | "utf8-sig" => Ok(Self::UTF8_SIG),
            "latin-1" => Self::parse("latin1"),
            other => Encoding::for_label(other.as_bytes())
                .map(|encoding| Self {
                    encoding,
                    bom: false,
                })
                .ok_or_else(|| ReportError::UnknownEncoding {
                    label: label.to_string(),
                }),
        }
    }

    /// Label as written in diagnostics.
    pub fn name(&self) -> String {
        if self.bom {
            "utf-8-sig".to_string()
        } else {
            self.encoding.name().to_ascii_lowercase()
        }
    }

    /// Encodes `text`; `None` when a character has no mapping.
    pub fn encode(&self, text: &str) -> Option<Vec<u8>> {
        if self.encoding == UTF_8 {
            let mut out = Vec::with_capacity(text.len() + UTF8_BOM.len());
            if self.bom {
                out.extend_from_slice(&UTF8_BOM);
            }
            out.extend_from_slice(text.as_bytes());
            return Some(out);
        }
        let (bytes, _, had_errors) = self.encoding.encode(text);
        (!had_errors).then(|| bytes.into_owned())
    }
}

/// Encodes and writes `text`, creating parent directories.
pub fn write_text(path: &Path, text: &str, encoding: TextEncoding) -> Result<()> {
    let bytes = encoding
        .encode(text)
        .ok_or_else(|| ReportError::Unmappable {
            encoding: encoding.name(),
            path: path.to_path_buf(),
        })?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ReportError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, bytes).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_sig_prepends_bom() {
        let bytes = TextEncoding::parse("utf-8-sig").unwrap().encode("A").unwrap();
        assert_eq!(bytes, vec![0xEF, 0xBB, 0xBF, b'A']);
        let bytes = TextEncoding::parse("UTF8").unwrap().encode("A").unwrap();
        assert_eq!(bytes, b"A");
    }

    #[test]
    fn windows_labels() {
        for label in ["cp1252", "windows-1252", "latin1", "latin-1"] {
            let encoding = TextEncoding::parse(label).unwrap();
            assert_eq!(encoding.name(), "windows-1252");
            assert_eq!(encoding.encode("é").unwrap(), vec![0xE9]);
        }
    }

    #[test]
    fn unmappable_and_unknown() {
        let cp1252 = TextEncoding::parse("cp1252").unwrap();
        assert!(cp1252.encode("日本").is_none());
        assert!(matches!(
            TextEncoding::parse("klingon"),
            Err(ReportError::UnknownEncoding { .. })
        ));

        let dir = tempfile::tempdir().unwrap();
        let err = write_text(&dir.path().join("x.txt"), "日本", cp1252).unwrap_err();
        assert!(err.to_string().contains("windows-1252"));
    }
}
