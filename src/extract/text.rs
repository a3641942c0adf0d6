use super::{ExtractionError, Extractor};

/// Plain text files are decoded as UTF-8 and passed through untouched.
pub struct TextExtractor;

impl Extractor for TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| ExtractionError::InvalidUtf8(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_verbatim() {
        let text = TextExtractor.extract("line one\n  línea dos\n".as_bytes()).unwrap();
        assert_eq!(text, "line one\n  línea dos\n");
    }

    #[test]
    fn test_empty_file() {
        assert_eq!(TextExtractor.extract(b"").unwrap(), "");
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let err = TextExtractor.extract(&[0x66, 0x6f, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidUtf8(_)));
    }
}
