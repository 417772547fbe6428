use serde::{Deserialize, Serialize};

/// Supported upload formats. Anything else is rejected before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Image,
    Csv,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Pdf => "pdf",
            DocumentType::Image => "image",
            DocumentType::Csv => "csv",
        }
    }
}

/// Row/column shape of a parsed CSV document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableShape {
    pub rows: u32,
    pub columns: u32,
    /// Rows whose field count matches the header row.
    pub consistent_rows: u32,
}

/// Normalized output of the parser. Lives for one request only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub text: String,
    pub source_format: DocumentType,
    pub ocr_used: bool,
    pub page_count: u32,
    pub table_shape: Option<TableShape>,
}

/// Number of features the extractor produces. The anomaly model artifact
/// must declare the same count.
pub const FEATURE_COUNT: usize = 18;

/// Fixed-length feature vector in canonical order.
///
/// Index layout (see [`FeatureVector::feature_names`]): text statistics
/// (0-4), quality metrics (5-8), numeric content (9-13), token counts
/// (13-14), structure (15), source signals (16-17).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn get(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Canonical feature names, index-aligned with the vector.
    pub fn feature_names() -> [&'static str; FEATURE_COUNT] {
        [
            "char_count",
            "word_count",
            "avg_word_length",
            "line_count",
            "whitespace_ratio",
            "entropy",
            "uppercase_ratio",
            "digit_ratio",
            "special_char_ratio",
            "number_count",
            "number_mean",
            "number_std",
            "number_max",
            "currency_count",
            "date_count",
            "empty_line_ratio",
            "ocr_used",
            "csv_row_consistency",
        ]
    }
}

/// Canonical indices into a [`FeatureVector`].
pub mod feature_index {
    pub const CHAR_COUNT: usize = 0;
    pub const WORD_COUNT: usize = 1;
    pub const AVG_WORD_LENGTH: usize = 2;
    pub const LINE_COUNT: usize = 3;
    pub const WHITESPACE_RATIO: usize = 4;
    pub const ENTROPY: usize = 5;
    pub const UPPERCASE_RATIO: usize = 6;
    pub const DIGIT_RATIO: usize = 7;
    pub const SPECIAL_CHAR_RATIO: usize = 8;
    pub const NUMBER_COUNT: usize = 9;
    pub const NUMBER_MEAN: usize = 10;
    pub const NUMBER_STD: usize = 11;
    pub const NUMBER_MAX: usize = 12;
    pub const CURRENCY_COUNT: usize = 13;
    pub const DATE_COUNT: usize = 14;
    pub const EMPTY_LINE_RATIO: usize = 15;
    pub const OCR_USED: usize = 16;
    pub const CSV_ROW_CONSISTENCY: usize = 17;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// A failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
}

/// Structured fields pulled out of document content for cross-document
/// consistency analysis. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub batch_id: Option<String>,
    pub exporter: Option<String>,
    pub quantity: Option<String>,
    pub certificate_id: Option<String>,
    #[serde(default)]
    pub dates: Vec<String>,
}

impl ExtractedEntities {
    pub fn is_empty(&self) -> bool {
        self.batch_id.is_none()
            && self.exporter.is_none()
            && self.quantity.is_none()
            && self.certificate_id.is_none()
            && self.dates.is_empty()
    }
}

/// Complete verification verdict for one upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// SHA-256 hex digest of the uploaded bytes.
    pub file_id: String,
    /// Fused fraud score, 0-100 (higher = more suspicious).
    pub fraud_score: f64,
    pub risk_level: RiskLevel,
    pub is_anomaly: bool,
    pub rule_violations: Vec<RuleViolation>,
    /// First 200 characters of extracted text, newlines collapsed.
    pub text_excerpt: String,
    pub extracted_entities: ExtractedEntities,
}

/// Caller-declared facts about the uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub filename: String,
    pub document_type: DocumentType,
    pub size_bytes: u64,
}

impl DocumentMetadata {
    pub fn new(filename: impl Into<String>, document_type: DocumentType, size_bytes: u64) -> Self {
        Self {
            filename: filename.into(),
            document_type,
            size_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            "\"critical\""
        );
        assert_eq!(serde_json::to_string(&RiskLevel::Low).unwrap(), "\"low\"");
    }

    #[test]
    fn feature_names_align_with_count() {
        assert_eq!(FeatureVector::feature_names().len(), FEATURE_COUNT);
        assert_eq!(
            FeatureVector::feature_names()[feature_index::CSV_ROW_CONSISTENCY],
            "csv_row_consistency"
        );
    }

    #[test]
    fn entities_default_is_empty() {
        let entities = ExtractedEntities::default();
        assert!(entities.is_empty());

        let entities = ExtractedEntities {
            exporter: Some("Acme Foods".to_string()),
            ..Default::default()
        };
        assert!(!entities.is_empty());
    }
}
