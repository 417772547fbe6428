//! Document parsing for the verification pipeline.
//!
//! Converts a raw upload (PDF, image, or CSV) into a normalized
//! [`ParsedDocument`](shared_types::ParsedDocument): extracted text plus
//! structural metadata. PDFs go through native text-layer extraction first
//! and fall back to OCR over a bounded number of leading pages when the
//! text layer is empty; images always go through OCR; CSVs are read as
//! tabular text directly.

pub mod classify;
pub mod ocr;
pub mod parser;
pub mod pdf;
pub mod tabular;

pub use classify::classify_document_type;
pub use ocr::{OcrEngine, TesseractOcr};
pub use parser::{DocumentParser, ParserConfig};

use thiserror::Error;

/// Errors raised while turning upload bytes into a [`ParsedDocument`].
///
/// `UnsupportedFormat` is a caller-facing validation error raised before
/// any parsing starts; the rest indicate unreadable or corrupt content.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid PDF: {0}")]
    InvalidPdf(String),

    #[error("password-protected PDF")]
    PasswordProtected,

    #[error("invalid CSV: {0}")]
    InvalidCsv(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("no text content detected")]
    EmptyDocument,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
