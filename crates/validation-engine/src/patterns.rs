//! Shared token patterns for feature extraction and entity extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Numbers with optional thousands separators and decimals.
    pub static ref NUMBER_RE: Regex =
        Regex::new(r"\b\d{1,3}(?:,\d{3})*(?:\.\d+)?\b").unwrap();

    /// Currency symbols and common ISO currency codes.
    pub static ref CURRENCY_RE: Regex =
        Regex::new(r"[$€£¥]|\b(?:USD|EUR|GBP|JPY|CNY|INR)\b").unwrap();

    /// Date formats seen in trade documents: ISO, DD/MM/YYYY, MM-DD-YYYY.
    pub static ref DATE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").unwrap(),
        Regex::new(r"\b\d{2}/\d{2}/\d{4}\b").unwrap(),
        Regex::new(r"\b\d{2}-\d{2}-\d{4}\b").unwrap(),
    ];

    /// Canonical batch token, `BATCH-YYYYMMDD-XXXXXX` with loose separators.
    pub static ref BATCH_TOKEN_RE: Regex =
        Regex::new(r"(?i)\bBATCH[-_ ]?(\d{8})[-_ ]?([A-Za-z0-9]{6})\b").unwrap();

    /// Labelled batch reference, e.g. `Batch No: 7A-2210`.
    pub static ref BATCH_LABELED_RE: Regex =
        Regex::new(r"(?i)\bbatch\s*(?:id|no|number|#)?\s*[:#]\s*([A-Za-z0-9][A-Za-z0-9-]{3,})")
            .unwrap();

    /// Labelled exporter name; stops at line breaks and separators.
    pub static ref EXPORTER_RE: Regex =
        Regex::new(r"(?i)\bexporter(?:\s+name)?\s*[:\-]\s*([^\r\n;,]{2,80})").unwrap();

    /// Labelled quantity with an optional trade unit.
    pub static ref QUANTITY_RE: Regex = Regex::new(
        r"(?i)\b(?:quantity|qty|net\s+weight|gross\s+weight)\s*[:\-]?\s*(\d[\d,.]*\s*(?:kg|kgs|mt|tons?|tonnes?|lbs?|pcs|units?|cartons?|bags?)?)\b"
    )
    .unwrap();

    /// Labelled certificate reference, e.g. `Certificate No: FDA-2210-X`.
    pub static ref CERT_LABELED_RE: Regex = Regex::new(
        r"(?i)\bcert(?:ificate)?\s*(?:id|no|number|#)?\s*[:#]\s*([A-Za-z0-9][A-Za-z0-9/-]{3,})"
    )
    .unwrap();

    /// Standalone certificate token, e.g. `CERT/2026/0042`.
    pub static ref CERT_TOKEN_RE: Regex =
        Regex::new(r"\b(?:CERT|CERTIFICATE)[-/][A-Z0-9][A-Z0-9/-]{2,}\b").unwrap();
}

/// Whether the text carries any certificate reference at all.
pub fn has_certificate_reference(text: &str) -> bool {
    CERT_LABELED_RE.is_match(text) || CERT_TOKEN_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_pattern_handles_separators() {
        let matches: Vec<&str> = NUMBER_RE
            .find_iter("total 1,200.50 over 42 units")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(matches, vec!["1,200.50", "42"]);
    }

    #[test]
    fn date_patterns_cover_common_formats() {
        assert!(DATE_PATTERNS[0].is_match("issued 2026-01-15"));
        assert!(DATE_PATTERNS[1].is_match("issued 15/01/2026"));
        assert!(DATE_PATTERNS[2].is_match("issued 01-15-2026"));
    }

    #[test]
    fn certificate_reference_both_forms() {
        assert!(has_certificate_reference("Certificate No: FDA-2210"));
        assert!(has_certificate_reference("attached CERT/2026/0042 herein"));
        assert!(!has_certificate_reference("no formal papers attached"));
    }

    #[test]
    fn batch_token_normalizable() {
        let caps = BATCH_TOKEN_RE
            .captures("shipment BATCH-20260115-A1B2C3 cleared")
            .unwrap();
        assert_eq!(&caps[1], "20260115");
        assert_eq!(&caps[2], "A1B2C3");
    }
}
