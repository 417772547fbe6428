//! Upload format classification from declared MIME type and extension.

use crate::ParseError;
use shared_types::DocumentType;

/// Determine the document type from the declared MIME type and filename.
///
/// Unknown combinations are rejected here, before any bytes are parsed.
pub fn classify_document_type(filename: &str, mime_type: &str) -> Result<DocumentType, ParseError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    let mime_lower = mime_type.to_ascii_lowercase();

    if mime_lower == "application/pdf" || extension == "pdf" {
        return Ok(DocumentType::Pdf);
    }
    if mime_lower.starts_with("image/") || matches!(extension.as_str(), "png" | "jpg" | "jpeg") {
        return Ok(DocumentType::Image);
    }
    if mime_lower == "text/csv" || extension == "csv" {
        return Ok(DocumentType::Csv);
    }

    Err(ParseError::UnsupportedFormat(format!(
        "{} ({})",
        filename, mime_type
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_mime_type() {
        assert_eq!(
            classify_document_type("upload.bin", "application/pdf").unwrap(),
            DocumentType::Pdf
        );
        assert_eq!(
            classify_document_type("scan", "image/png").unwrap(),
            DocumentType::Image
        );
        assert_eq!(
            classify_document_type("rows", "text/csv").unwrap(),
            DocumentType::Csv
        );
    }

    #[test]
    fn classifies_by_extension_when_mime_is_generic() {
        assert_eq!(
            classify_document_type("cert.PDF", "application/octet-stream").unwrap(),
            DocumentType::Pdf
        );
        assert_eq!(
            classify_document_type("photo.JPEG", "application/octet-stream").unwrap(),
            DocumentType::Image
        );
    }

    #[test]
    fn rejects_unknown_formats() {
        let err = classify_document_type("archive.zip", "application/zip").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedFormat(_)));
    }
}
