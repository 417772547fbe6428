//! Content-size checks.

use shared_types::{feature_index, FeatureVector, RuleViolation, Severity};

/// Fewer characters than this means a blank or corrupted upload.
const MIN_CHARS: f64 = 10.0;
/// More characters than this means a malformed file or an attack payload.
const MAX_CHARS: f64 = 100_000.0;
const WORD_LENGTH_BAND: (f64, f64) = (2.0, 15.0);

pub fn check_minimum_content(features: &FeatureVector) -> Option<RuleViolation> {
    let chars = features.get(feature_index::CHAR_COUNT);
    (chars < MIN_CHARS).then(|| RuleViolation {
        rule_id: "minimum_content".to_string(),
        severity: Severity::Critical,
        message: format!(
            "Document has insufficient content ({} chars); possible blank or corrupted file",
            chars as u64
        ),
    })
}

pub fn check_maximum_content(features: &FeatureVector) -> Option<RuleViolation> {
    let chars = features.get(feature_index::CHAR_COUNT);
    (chars > MAX_CHARS).then(|| RuleViolation {
        rule_id: "maximum_content".to_string(),
        severity: Severity::High,
        message: format!(
            "Document exceeds maximum size ({} chars); possible malformed file",
            chars as u64
        ),
    })
}

pub fn check_word_length_band(features: &FeatureVector) -> Option<RuleViolation> {
    let avg = features.get(feature_index::AVG_WORD_LENGTH);
    let (low, high) = WORD_LENGTH_BAND;
    (avg < low || avg > high).then(|| RuleViolation {
        rule_id: "word_length_band".to_string(),
        severity: Severity::Medium,
        message: format!(
            "Average word length {:.1} is unusual; possible gibberish or encoding error",
            avg
        ),
    })
}
