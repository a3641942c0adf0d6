use lopdf::Document;
use tracing::{debug, warn};

use super::{ExtractionError, Extractor};

/// Extracts page text with lopdf, one page per line block in page order.
///
/// Pages without extractable text (scans, blank pages) contribute nothing;
/// only a document that cannot be loaded at all is an error.
pub struct PdfExtractor;

impl Extractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let doc = Document::load_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;

        let pages = doc.get_pages();
        debug!(page_count = pages.len(), "Extracting PDF text");

        let mut page_texts = Vec::with_capacity(pages.len());
        for page_number in pages.keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(page_text) => page_texts.push(page_text),
                Err(e) => {
                    warn!(page = page_number, error = %e, "Skipping PDF page without extractable text");
                }
            }
        }

        Ok(join_pages(page_texts))
    }
}

/// Each page's text is kept as extracted and followed by a newline; pages
/// with nothing but whitespace are dropped.
fn join_pages(page_texts: impl IntoIterator<Item = String>) -> String {
    let mut text = String::new();
    for page_text in page_texts {
        if page_text.trim().is_empty() {
            continue;
        }
        text.push_str(&page_text);
        text.push('\n');
    }
    text
}
