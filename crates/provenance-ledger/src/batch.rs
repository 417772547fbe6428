//! Batch identifier generation.
//!
//! Format: `BATCH-YYYYMMDD-XXXXXX`: creation date plus six uppercase hex
//! characters, human-readable and safe to embed in QR payloads.

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BATCH_ID_RE: Regex = Regex::new(r"^BATCH-\d{8}-[A-F0-9]{6}$").unwrap();
}

pub struct BatchId;

impl BatchId {
    /// Generate a fresh batch id for the current UTC date.
    pub fn generate() -> String {
        let date_part = Utc::now().format("%Y%m%d");
        let uuid = uuid::Uuid::new_v4();
        let random_part: String = uuid
            .simple()
            .to_string()
            .chars()
            .take(6)
            .collect::<String>()
            .to_uppercase();
        format!("BATCH-{}-{}", date_part, random_part)
    }

    pub fn is_valid(batch_id: &str) -> bool {
        BATCH_ID_RE.is_match(batch_id)
    }
}
