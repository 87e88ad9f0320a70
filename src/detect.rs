//! Input kind detection.
//!
//! Outlines can be inferred from a PDF file or from a previously captured
//! fragment feed stored as JSON. Detection looks at the leading bytes, not
//! the file extension, so mislabelled files are still routed correctly.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3;

/// How many leading bytes are inspected.
const SNIFF_LEN: usize = 1024;

/// Kind of input recognized from its leading bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// A PDF document with its header version (e.g. "1.7").
    Pdf { version: String },
    /// A serialized fragment feed (JSON object).
    FeedJson,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Pdf { version } => write!(f, "PDF {}", version),
            InputKind::FeedJson => write!(f, "fragment feed (JSON)"),
        }
    }
}

/// Detect the input kind of a file.
pub fn detect_input_kind<P: AsRef<Path>>(path: P) -> Result<InputKind> {
    let mut file = File::open(path)?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    file.by_ref()
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut header)?;
    detect_input_kind_from_bytes(&header)
}

/// Detect the input kind from the leading bytes of a file.
pub fn detect_input_kind_from_bytes(data: &[u8]) -> Result<InputKind> {
    if data.starts_with(PDF_MAGIC) {
        return pdf_version(data).map(|version| InputKind::Pdf { version });
    }

    // A UTF-8 BOM is tolerated in front of a JSON feed
    let body = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    match body.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => Ok(InputKind::FeedJson),
        _ => Err(Error::UnknownFormat),
    }
}

/// Extract and validate the version from a `%PDF-x.y` header.
fn pdf_version(data: &[u8]) -> Result<String> {
    let start = PDF_MAGIC.len();
    let Some(version_bytes) = data.get(start..start + VERSION_LEN) else {
        return Err(Error::UnknownFormat);
    };

    let version = String::from_utf8_lossy(version_bytes).to_string();
    let mut chars = version.chars();
    let valid = matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(major), Some('.'), Some(minor)) if major.is_ascii_digit() && minor.is_ascii_digit()
    );
    if !valid {
        return Err(Error::UnsupportedVersion(version));
    }
    Ok(version)
}

/// Check whether a file starts with a valid PDF header.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    matches!(detect_input_kind(path), Ok(InputKind::Pdf { .. }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_pdf() {
        let kind = detect_input_kind_from_bytes(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
        assert_eq!(
            kind,
            InputKind::Pdf {
                version: "1.7".to_string()
            }
        );
    }

    #[test]
    fn test_detect_feed_json() {
        let kind = detect_input_kind_from_bytes(b"  \n{\"fragments\": []}").unwrap();
        assert_eq!(kind, InputKind::FeedJson);

        let with_bom = detect_input_kind_from_bytes(b"\xEF\xBB\xBF{}").unwrap();
        assert_eq!(with_bom, InputKind::FeedJson);
    }

    #[test]
    fn test_detect_truncated_pdf_header() {
        let result = detect_input_kind_from_bytes(b"%PDF-");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_bad_pdf_version() {
        let result = detect_input_kind_from_bytes(b"%PDF-x.y\n");
        assert!(matches!(result, Err(Error::UnsupportedVersion(_))));
    }

    #[test]
    fn test_detect_unknown() {
        assert!(matches!(
            detect_input_kind_from_bytes(b"<!DOCTYPE html>"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            detect_input_kind_from_bytes(b""),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_input_kind_display() {
        let kind = InputKind::Pdf {
            version: "2.0".to_string(),
        };
        assert_eq!(kind.to_string(), "PDF 2.0");
    }
}
