//! Document-field checks: dates, certificate references, CSV shape.

use crate::patterns::has_certificate_reference;
use shared_types::{feature_index, FeatureVector, ParsedDocument, RuleViolation, Severity};

/// CSV rows below this arity-consistency ratio point at a truncated or
/// hand-edited export.
const MIN_ROW_CONSISTENCY: f64 = 0.9;

pub fn check_missing_date(features: &FeatureVector) -> Option<RuleViolation> {
    (features.get(feature_index::DATE_COUNT) < 1.0).then(|| RuleViolation {
        rule_id: "missing_date".to_string(),
        severity: Severity::Medium,
        message: "No date found in document; invoices and certificates require dates".to_string(),
    })
}

pub fn check_missing_certificate(document: &ParsedDocument) -> Option<RuleViolation> {
    (!has_certificate_reference(&document.text)).then(|| RuleViolation {
        rule_id: "missing_certificate".to_string(),
        severity: Severity::Medium,
        message: "No certificate identifier found in document".to_string(),
    })
}

pub fn check_csv_row_consistency(document: &ParsedDocument) -> Option<RuleViolation> {
    let shape = document.table_shape?;
    if shape.rows == 0 {
        return None;
    }
    let ratio = shape.consistent_rows as f64 / shape.rows as f64;
    (ratio < MIN_ROW_CONSISTENCY).then(|| RuleViolation {
        rule_id: "csv_row_inconsistency".to_string(),
        severity: Severity::High,
        message: format!(
            "{} of {} CSV rows do not match the header arity",
            shape.rows - shape.consistent_rows,
            shape.rows
        ),
    })
}
