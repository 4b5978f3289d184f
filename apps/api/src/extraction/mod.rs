//! Text extraction from uploaded resume documents.
//!
//! PDFs are read page by page so callers can report progress; everything
//! else is treated as UTF-8 text.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const PDF_CONTENT_TYPE: &str = "application/pdf";
const UTF8_BOM: char = '\u{feff}';

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported document: {0}")]
    Unsupported(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("Document contains no text")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedDocument {
    pub text: String,
    pub kind: DocumentKind,
    pub pages: usize,
    pub characters: usize,
}

impl ExtractedDocument {
    fn new(text: String, kind: DocumentKind, pages: usize) -> Result<Self, ExtractError> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ExtractError::Empty);
        }
        let characters = text.chars().count();
        Ok(Self {
            text,
            kind,
            pages,
            characters,
        })
    }
}

/// Turns document bytes into text. `progress` is called with
/// `(pages_done, pages_total)` as extraction advances.
pub trait TextExtractor: Send + Sync {
    fn extract(
        &self,
        bytes: &[u8],
        progress: &mut dyn FnMut(usize, usize),
    ) -> Result<ExtractedDocument, ExtractError>;
}

pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(
        &self,
        bytes: &[u8],
        progress: &mut dyn FnMut(usize, usize),
    ) -> Result<ExtractedDocument, ExtractError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| ExtractError::Pdf(e.to_string()))?;
        let total = pages.len();

        let mut text = String::new();
        for (index, page) in pages.iter().enumerate() {
            if index > 0 {
                text.push('\n');
            }
            text.push_str(page);
            progress(index + 1, total);
        }

        ExtractedDocument::new(text, DocumentKind::Pdf, total)
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(
        &self,
        bytes: &[u8],
        progress: &mut dyn FnMut(usize, usize),
    ) -> Result<ExtractedDocument, ExtractError> {
        if bytes.contains(&0) {
            return Err(ExtractError::Unsupported(
                "binary content is not a text document".to_string(),
            ));
        }
        let decoded = String::from_utf8_lossy(bytes);
        let text = decoded.strip_prefix(UTF8_BOM).unwrap_or(&decoded).to_string();
        progress(1, 1);
        ExtractedDocument::new(text, DocumentKind::Text, 1)
    }
}

/// PDF when the content type says so or the file name ends in `.pdf`.
pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> DocumentKind {
    let by_type = content_type
        .is_some_and(|ct| ct.trim().to_ascii_lowercase().starts_with(PDF_CONTENT_TYPE));
    let by_name = file_name.is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf"));
    if by_type || by_name {
        DocumentKind::Pdf
    } else {
        DocumentKind::Text
    }
}

pub fn extractor_for(kind: DocumentKind) -> Box<dyn TextExtractor> {
    match kind {
        DocumentKind::Pdf => Box::new(PdfTextExtractor),
        DocumentKind::Text => Box::new(PlainTextExtractor),
    }
}

/// Extracts with the extractor for `kind`, logging page progress.
/// Blocking: run it on the blocking pool.
pub fn extract_document(kind: DocumentKind, bytes: &[u8]) -> Result<ExtractedDocument, ExtractError> {
    let mut report = |done: usize, total: usize| {
        debug!(done, total, "document extraction progress");
    };
    extractor_for(kind).extract(bytes, &mut report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_progress() -> impl FnMut(usize, usize) {
        |_, _| {}
    }

    #[test]
    fn test_detect_by_content_type_or_extension() {
        assert_eq!(detect(Some("application/pdf"), None), DocumentKind::Pdf);
        assert_eq!(detect(Some("Application/PDF; charset=binary"), None), DocumentKind::Pdf);
        assert_eq!(detect(None, Some("CV_Final.PDF")), DocumentKind::Pdf);
        assert_eq!(detect(Some("text/plain"), Some("cv.txt")), DocumentKind::Text);
        assert_eq!(detect(None, None), DocumentKind::Text);
    }

    #[test]
    fn test_plain_text_strips_bom_and_trims() {
        let bytes = "\u{feff}  Ayşe Yılmaz\nYazılım Geliştirici \n".as_bytes();
        let doc = PlainTextExtractor.extract(bytes, &mut no_progress()).unwrap();
        assert_eq!(doc.text, "Ayşe Yılmaz\nYazılım Geliştirici");
        assert_eq!(doc.kind, DocumentKind::Text);
        assert_eq!(doc.pages, 1);
        assert_eq!(doc.characters, doc.text.chars().count());
    }

    #[test]
    fn test_plain_text_decodes_invalid_utf8_lossily() {
        let doc = PlainTextExtractor
            .extract(b"abc\xffdef", &mut no_progress())
            .unwrap();
        assert_eq!(doc.text, "abc\u{fffd}def");
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        let err = PlainTextExtractor
            .extract(b" \n\t ", &mut no_progress())
            .unwrap_err();
        assert!(matches!(err, ExtractError::Empty));
    }

    #[test]
    fn test_binary_content_is_unsupported() {
        let err = PlainTextExtractor
            .extract(b"PK\x03\x04\x00\x00", &mut no_progress())
            .unwrap_err();
        assert!(matches!(err, ExtractError::Unsupported(_)));
    }

    #[test]
    fn test_plain_text_reports_single_page_progress() {
        let mut seen = Vec::new();
        let mut record = |done: usize, total: usize| seen.push((done, total));
        PlainTextExtractor.extract(b"metin", &mut record).unwrap();
        assert_eq!(seen, vec![(1, 1)]);
    }

    #[test]
    fn test_garbage_pdf_is_an_error() {
        let err = PdfTextExtractor
            .extract(b"not a pdf at all", &mut no_progress())
            .unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}
