//! Text-quality checks.

use shared_types::{feature_index, FeatureVector, RuleViolation, Severity};

/// Plausible entropy range for real document text. Below: repetitive
/// filler; above: random noise.
const ENTROPY_BAND: (f64, f64) = (2.0, 7.0);
const MAX_DIGIT_RATIO: f64 = 0.5;

pub fn check_entropy_band(features: &FeatureVector) -> Option<RuleViolation> {
    let entropy = features.get(feature_index::ENTROPY);
    let (low, high) = ENTROPY_BAND;
    (entropy < low || entropy > high).then(|| RuleViolation {
        rule_id: "entropy_band".to_string(),
        severity: Severity::High,
        message: format!(
            "Text entropy {:.2} is abnormal; too repetitive or too random",
            entropy
        ),
    })
}

pub fn check_digit_ratio(features: &FeatureVector) -> Option<RuleViolation> {
    let ratio = features.get(feature_index::DIGIT_RATIO);
    (ratio > MAX_DIGIT_RATIO).then(|| RuleViolation {
        rule_id: "digit_ratio_limit".to_string(),
        severity: Severity::Low,
        message: format!(
            "Excessive digits in text ({:.0}%); unusual for trade documents",
            ratio * 100.0
        ),
    })
}
