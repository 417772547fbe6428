//! Parsing front door: classification and per-format dispatch.

use crate::classify::classify_document_type;
use crate::ocr::{OcrEngine, TesseractOcr};
use crate::pdf::PdfParser;
use crate::tabular::CsvParser;
use crate::ParseError;
use serde::{Deserialize, Serialize};
use shared_types::{DocumentType, ParsedDocument};
use std::sync::Arc;
use tracing::debug;

/// Parser tunables. The OCR page bound is a deliberate cost/accuracy
/// trade-off for scanned PDFs and is intentionally configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Native PDF text below this many characters is treated as
    /// "likely scanned" and routed to OCR.
    pub min_native_text_len: usize,
    /// Leading pages OCRed during PDF fallback.
    pub ocr_max_pages: usize,
    /// CSV rows read before the remainder is ignored.
    pub max_csv_rows: usize,
    /// OCR binary invoked by the default engine.
    pub tesseract_cmd: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_native_text_len: 10,
            ocr_max_pages: 1,
            max_csv_rows: 1000,
            tesseract_cmd: "tesseract".to_string(),
        }
    }
}

/// Converts raw upload bytes into a [`ParsedDocument`].
pub struct DocumentParser {
    config: ParserConfig,
    ocr: Arc<dyn OcrEngine>,
}

impl DocumentParser {
    pub fn new(config: ParserConfig) -> Self {
        let ocr: Arc<dyn OcrEngine> = Arc::new(TesseractOcr::new(config.tesseract_cmd.clone()));
        Self { config, ocr }
    }

    /// Substitute the OCR backend (tests, alternative engines).
    pub fn with_ocr_engine(config: ParserConfig, ocr: Arc<dyn OcrEngine>) -> Self {
        Self { config, ocr }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse an upload. Unsupported formats are rejected before any bytes
    /// are inspected.
    pub fn parse(
        &self,
        bytes: &[u8],
        filename: &str,
        mime_type: &str,
    ) -> Result<ParsedDocument, ParseError> {
        let document_type = classify_document_type(filename, mime_type)?;
        debug!(
            filename,
            document_type = document_type.as_str(),
            size = bytes.len(),
            "parsing upload"
        );

        match document_type {
            DocumentType::Pdf => PdfParser::parse(bytes, &self.config, self.ocr.as_ref()),
            DocumentType::Image => self.parse_image(bytes),
            DocumentType::Csv => CsvParser::parse(bytes, &self.config),
        }
    }

    fn parse_image(&self, bytes: &[u8]) -> Result<ParsedDocument, ParseError> {
        let text = self.ocr.recognize(bytes)?;
        if text.trim().is_empty() {
            return Err(ParseError::EmptyDocument);
        }
        Ok(ParsedDocument {
            text,
            source_format: DocumentType::Image,
            ocr_used: true,
            page_count: 1,
            table_shape: None,
        })
    }
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}
