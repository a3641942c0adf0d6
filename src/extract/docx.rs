use std::io::Cursor;

use docx_rust::document::BodyContent;
use docx_rust::DocxFile;
use tracing::debug;

use super::{ExtractionError, Extractor};

/// Word documents: one line per top-level body paragraph, in document order.
/// Paragraphs nested in tables are not visited.
pub struct DocxExtractor;

fn docx_error(e: impl std::fmt::Debug) -> ExtractionError {
    ExtractionError::Docx(format!("{:?}", e))
}

impl Extractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let file = DocxFile::from_reader(Cursor::new(bytes)).map_err(docx_error)?;
        let docx = file.parse().map_err(docx_error)?;

        let mut text = String::new();
        let mut paragraphs = 0usize;
        for content in &docx.document.body.content {
            if let BodyContent::Paragraph(paragraph) = content {
                text.push_str(&paragraph.text());
                text.push('\n');
                paragraphs += 1;
            }
        }

        debug!(paragraphs, "Extracted Word document text");
        Ok(text)
    }
}
