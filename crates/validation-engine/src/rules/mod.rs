//! Deterministic validation rules.
//!
//! A fixed, ordered set of independent checks over the parsed document and
//! its feature vector. Every check is pure and total: it never fails, and
//! missing data is itself evaluated (a document without a date is a
//! violation, not a skipped check). Each check emits at most one
//! violation with a statically assigned severity.

pub mod content;
pub mod fields;
pub mod quality;

use shared_types::{FeatureVector, ParsedDocument, RuleViolation, Severity};
use tracing::info;

pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run every rule in canonical order. No rule depends on another
    /// rule's outcome.
    pub fn evaluate(
        &self,
        document: &ParsedDocument,
        features: &FeatureVector,
    ) -> Vec<RuleViolation> {
        let mut violations = Vec::new();
        violations.extend(content::check_minimum_content(features));
        violations.extend(content::check_maximum_content(features));
        violations.extend(content::check_word_length_band(features));
        violations.extend(quality::check_entropy_band(features));
        violations.extend(quality::check_digit_ratio(features));
        violations.extend(fields::check_missing_date(features));
        violations.extend(fields::check_missing_certificate(document));
        violations.extend(fields::check_csv_row_consistency(document));

        for violation in &violations {
            info!(
                rule = %violation.rule_id,
                severity = ?violation.severity,
                "rule violation"
            );
        }
        violations
    }

    /// Worst severity among the violations, if any.
    pub fn max_severity(violations: &[RuleViolation]) -> Option<Severity> {
        violations.iter().map(|v| v.severity).max()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}
