//! Document text extraction
//!
//! Turns an uploaded file into plain text for the model. The extractor is
//! picked from the file's declared content type:
//! - `application/pdf` - page text, one page after another
//! - `...wordprocessingml.document` - paragraph text in document order
//! - `text/plain` - UTF-8 decode, verbatim
//! - `...spreadsheetml.sheet` - every sheet as a markdown table
//!
//! Anything else has no extractor and yields empty text.

pub mod docx;
pub mod pdf;
pub mod spreadsheet;
pub mod text;

use serde::Serialize;

pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;
pub use spreadsheet::SpreadsheetExtractor;
pub use text::TextExtractor;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TEXT_MIME: &str = "text/plain";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("Unreadable PDF: {0}")]
    Pdf(String),

    #[error("Unreadable Word document: {0}")]
    Docx(String),

    #[error("Unreadable spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("Text file is not valid UTF-8: {0}")]
    InvalidUtf8(String),
}

/// Uniform contract every format-specific extractor implements.
pub trait Extractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Docx,
    Text,
    Spreadsheet,
}

impl FileKind {
    /// Map a MIME type to a kind. Parameters such as `charset` are ignored.
    pub fn from_mime(content_type: &str) -> Option<Self> {
        let parsed: mime::Mime = content_type.trim().parse().ok()?;
        match parsed.essence_str() {
            PDF_MIME => Some(FileKind::Pdf),
            DOCX_MIME => Some(FileKind::Docx),
            TEXT_MIME => Some(FileKind::Text),
            XLSX_MIME => Some(FileKind::Spreadsheet),
            _ => None,
        }
    }

    /// Resolve the kind of an upload. A missing or generic declared type falls
    /// back to a guess from the file name's extension.
    pub fn for_upload(content_type: Option<&str>, file_name: &str) -> Option<Self> {
        match content_type.map(str::trim) {
            Some(declared)
                if !declared.is_empty()
                    && declared != mime::APPLICATION_OCTET_STREAM.essence_str() =>
            {
                Self::from_mime(declared)
            }
            _ => mime_guess::from_path(file_name)
                .first()
                .and_then(|guessed| Self::from_mime(guessed.essence_str())),
        }
    }

    pub fn extractor(&self) -> &'static dyn Extractor {
        match self {
            FileKind::Pdf => &PdfExtractor,
            FileKind::Docx => &DocxExtractor,
            FileKind::Text => &TextExtractor,
            FileKind::Spreadsheet => &SpreadsheetExtractor,
        }
    }
}

/// Extract text for a resolved kind. Unsupported files (`None`) produce an
/// empty string rather than an error.
pub fn extract_text(kind: Option<FileKind>, bytes: &[u8]) -> Result<String, ExtractionError> {
    match kind {
        Some(kind) => kind.extractor().extract(bytes),
        None => Ok(String::new()),
    }
}
