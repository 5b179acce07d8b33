//! Text extraction for uploaded resumes and job descriptions.
//!
//! Dispatch is by declared media type first, then by file extension. Nothing
//! read here is persisted.

mod docx;
mod pdf;

use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

/// Extensions offered by file pickers and accepted on the command line.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["txt", "md", "pdf", "doc", "docx"];

const MIME_PDF: &str = "application/pdf";
const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const MIME_OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read text file.")]
    Read(#[from] std::io::Error),

    #[error("Could not extract text from {}.", .extension.to_uppercase())]
    Unsupported { extension: String },

    #[error("Could not extract text from {}.", .extension.to_uppercase())]
    Corrupt { extension: String, reason: String },
}

/// How a file's bytes are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Picks an extractor from the declared media type, falling back to the
    /// file name's extension when the type is missing or generic.
    pub fn detect(declared_mime: Option<&str>, file_name: &str) -> Self {
        let mime = declared_mime
            .map(|m| m.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match mime.as_str() {
            MIME_PDF => return Self::Pdf,
            MIME_DOCX => return Self::Docx,
            m if m.starts_with("text/") => return Self::PlainText,
            // Generic or missing types say nothing; the extension decides.
            MIME_OCTET_STREAM | "" => {}
            _ => {}
        }

        match extension_of(file_name).as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            // .doc is legacy binary Word; it is read as text like any other file.
            _ => Self::PlainText,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PlainText => "text",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

/// Lower-cased extension without the dot, or an empty string.
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Returns true when `file_name` carries one of [`ACCEPTED_EXTENSIONS`].
pub fn is_accepted(file_name: &str) -> bool {
    ACCEPTED_EXTENSIONS.contains(&extension_of(file_name).as_str())
}

/// Converts a file's bytes into plain text.
pub fn extract_text(
    bytes: &[u8],
    declared_mime: Option<&str>,
    file_name: &str,
) -> Result<String, ExtractError> {
    let kind = DocumentKind::detect(declared_mime, file_name);
    debug!(file_name, kind = kind.label(), size = bytes.len(), "Extracting text");

    let extension = extension_of(file_name);
    let result = match kind {
        DocumentKind::PlainText => Ok(decode_text(bytes)),
        DocumentKind::Pdf => pdf::extract(bytes),
        DocumentKind::Docx => docx::extract(bytes),
    };

    result.map_err(|reason| {
        warn!(file_name, %reason, "Text extraction failed");
        ExtractError::Corrupt {
            extension: if extension.is_empty() {
                kind.label().to_string()
            } else {
                extension
            },
            reason,
        }
    })
}

/// Reads a file from disk and extracts its text.
///
/// Files with an extension outside [`ACCEPTED_EXTENSIONS`] are rejected before
/// any bytes are read.
pub fn extract_file(path: &Path, declared_mime: Option<&str>) -> Result<String, ExtractError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    if declared_mime.is_none() && !is_accepted(&file_name) {
        return Err(ExtractError::Unsupported {
            extension: extension_of(&file_name),
        });
    }

    let bytes = std::fs::read(path)?;
    extract_text(&bytes, declared_mime, &file_name)
}

/// UTF-8 decode with replacement characters, dropping a leading BOM.
fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_plain_text_round_trip() {
        let input = "Senior PM\nShipped payments platform — 40% growth\n";
        let text = extract_text(input.as_bytes(), Some("text/plain"), "resume.txt").unwrap();
        assert_eq!(text, input);
    }

    #[test]
    fn test_markdown_without_mime_is_text() {
        let input = "# Resume\n- item";
        let text = extract_text(input.as_bytes(), None, "cv.md").unwrap();
        assert_eq!(text, input);
    }

    #[test]
    fn test_bom_is_dropped() {
        let text = extract_text(b"\xEF\xBB\xBFhello", None, "a.txt").unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let text = extract_text(b"ok \xFF done", None, "a.txt").unwrap();
        assert_eq!(text, "ok \u{FFFD} done");
    }

    #[test]
    fn test_detect_prefers_declared_mime() {
        assert_eq!(
            DocumentKind::detect(Some("application/pdf"), "resume.txt"),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::detect(Some(MIME_DOCX), "resume.bin"),
            DocumentKind::Docx
        );
        assert_eq!(
            DocumentKind::detect(Some("text/markdown"), "resume.pdf"),
            DocumentKind::PlainText
        );
    }

    #[test]
    fn test_detect_falls_back_to_extension() {
        assert_eq!(DocumentKind::detect(None, "CV.PDF"), DocumentKind::Pdf);
        assert_eq!(
            DocumentKind::detect(Some(MIME_OCTET_STREAM), "cv.docx"),
            DocumentKind::Docx
        );
        assert_eq!(DocumentKind::detect(Some(""), "cv.doc"), DocumentKind::PlainText);
        assert_eq!(DocumentKind::detect(None, "notes"), DocumentKind::PlainText);
    }

    #[test]
    fn test_corrupt_pdf_reports_extension() {
        let err = extract_text(b"definitely not a pdf", None, "resume.pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Corrupt { .. }));
        assert_eq!(err.to_string(), "Could not extract text from PDF.");
    }

    #[test]
    fn test_corrupt_docx_reports_extension() {
        let err = extract_text(b"PK not really", None, "resume.docx").unwrap_err();
        assert_eq!(err.to_string(), "Could not extract text from DOCX.");
    }

    #[test]
    fn test_extract_file_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::write(&path, b"\x89PNG").unwrap();
        let err = extract_file(&path, None).unwrap_err();
        assert_eq!(err.to_string(), "Could not extract text from PNG.");
    }

    #[test]
    fn test_extract_file_reads_text() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "Product Manager, 8 years").unwrap();
        let text = extract_file(file.path(), None).unwrap();
        assert_eq!(text, "Product Manager, 8 years");
    }

    #[test]
    fn test_extract_file_missing_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_file(&dir.path().join("gone.txt"), None).unwrap_err();
        assert!(matches!(err, ExtractError::Read(_)));
        assert_eq!(err.to_string(), "Failed to read text file.");
    }

    #[test]
    fn test_is_accepted() {
        assert!(is_accepted("a.DOCX"));
        assert!(is_accepted("b.md"));
        assert!(!is_accepted("c.rtf"));
        assert!(!is_accepted("noext"));
    }
}
