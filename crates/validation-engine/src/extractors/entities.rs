//! Structured-entity extraction from document text.
//!
//! Pattern/heuristic extraction of the fields compared across documents
//! of the same shipment. Every field extraction succeeds or comes back
//! `None` on its own; extraction never blocks the pipeline.

use crate::patterns::{
    BATCH_LABELED_RE, BATCH_TOKEN_RE, CERT_LABELED_RE, CERT_TOKEN_RE, DATE_PATTERNS, EXPORTER_RE,
    QUANTITY_RE,
};
use shared_types::ExtractedEntities;
use tracing::debug;

pub struct EntityExtractor;

impl EntityExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> ExtractedEntities {
        let entities = ExtractedEntities {
            batch_id: extract_batch_id(text),
            exporter: extract_exporter(text),
            quantity: extract_quantity(text),
            certificate_id: extract_certificate_id(text),
            dates: extract_dates(text),
        };
        debug!(
            batch_id = ?entities.batch_id,
            exporter = ?entities.exporter,
            dates = entities.dates.len(),
            "entities extracted"
        );
        entities
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical batch token first, labelled reference as fallback.
fn extract_batch_id(text: &str) -> Option<String> {
    if let Some(caps) = BATCH_TOKEN_RE.captures(text) {
        return Some(format!("BATCH-{}-{}", &caps[1], caps[2].to_uppercase()));
    }
    BATCH_LABELED_RE
        .captures(text)
        .map(|caps| caps[1].to_uppercase())
}

fn extract_exporter(text: &str) -> Option<String> {
    EXPORTER_RE.captures(text).and_then(|caps| {
        let name = caps[1].trim().trim_end_matches('.').trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}

fn extract_quantity(text: &str) -> Option<String> {
    QUANTITY_RE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

fn extract_certificate_id(text: &str) -> Option<String> {
    if let Some(caps) = CERT_LABELED_RE.captures(text) {
        return Some(caps[1].trim().to_string());
    }
    CERT_TOKEN_RE.find(text).map(|m| m.as_str().to_string())
}

/// All date tokens in order of appearance, deduplicated.
fn extract_dates(text: &str) -> Vec<String> {
    let mut dates: Vec<String> = Vec::new();
    for pattern in DATE_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            let value = m.as_str().to_string();
            if !dates.contains(&value) {
                dates.push(value);
            }
        }
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_all_fields_from_a_certificate() {
        let text = "CERTIFICATE OF ORIGIN\n\
                    Certificate No: FDA-2210-X\n\
                    Batch: BATCH-20260115-A1B2C3\n\
                    Exporter: Acme Foods\n\
                    Net Weight: 1,200 kg\n\
                    Issued 2026-01-15, shipped 2026-01-20";
        let entities = EntityExtractor::new().extract(text);

        assert_eq!(entities.batch_id.as_deref(), Some("BATCH-20260115-A1B2C3"));
        assert_eq!(entities.exporter.as_deref(), Some("Acme Foods"));
        assert_eq!(entities.quantity.as_deref(), Some("1,200 kg"));
        assert_eq!(entities.certificate_id.as_deref(), Some("FDA-2210-X"));
        assert_eq!(entities.dates, vec!["2026-01-15", "2026-01-20"]);
    }

    #[test]
    fn lowercase_batch_token_is_normalized() {
        let entities = EntityExtractor::new().extract("ref batch-20260115-a1b2c3 enclosed");
        assert_eq!(entities.batch_id.as_deref(), Some("BATCH-20260115-A1B2C3"));
    }

    #[test]
    fn labelled_batch_reference_is_a_fallback() {
        let entities = EntityExtractor::new().extract("Batch No: 7A-2210X");
        assert_eq!(entities.batch_id.as_deref(), Some("7A-2210X"));
    }

    #[test]
    fn standalone_certificate_token_is_found() {
        let entities = EntityExtractor::new().extract("cleared under CERT/2026/0042 yesterday");
        assert_eq!(entities.certificate_id.as_deref(), Some("CERT/2026/0042"));
    }

    #[test]
    fn absent_fields_stay_absent() {
        let entities = EntityExtractor::new().extract("an unrelated memo about warehouse keys");
        assert!(entities.is_empty());
    }

    #[test]
    fn duplicate_dates_are_collapsed() {
        let entities =
            EntityExtractor::new().extract("signed 2026-01-15 and countersigned 2026-01-15");
        assert_eq!(entities.dates, vec!["2026-01-15"]);
    }
}
