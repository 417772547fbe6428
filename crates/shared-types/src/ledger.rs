//! Tamper-evident ledger record types.
//!
//! Each record embeds the SHA-256 hash of its predecessor, forming a singly
//! linked hash chain. The hash of a record is computed over its **canonical
//! serialization**: the compact JSON encoding of the record with the
//! `record_hash` field omitted and all object keys in ascending lexical
//! order, at every nesting level. External auditors can recompute any
//! record hash from the persisted JSON alone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::{DocumentMetadata, ValidationResult};

/// A single immutable ledger entry. Once written it is permanent and
/// cryptographically linked to its predecessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Unique batch identifier, `BATCH-YYYYMMDD-XXXXXX`.
    pub batch_id: String,
    /// UTC creation time, immutable.
    pub timestamp: DateTime<Utc>,
    /// SHA-256 hex digest of the uploaded file bytes.
    pub file_id: String,
    pub document_metadata: DocumentMetadata,
    pub validation_result: ValidationResult,
    /// Hash of the immediately preceding record; `None` is the genesis
    /// sentinel (serialized as JSON `null`).
    pub previous_hash: Option<String>,
    /// SHA-256 hex digest of this record's canonical serialization,
    /// `previous_hash` included.
    pub record_hash: String,
}

/// Canonical hash payload: every record field except `record_hash`. Kept
/// private so the hashed field set cannot drift from the record
/// definition unnoticed.
#[derive(Serialize)]
struct HashPayload<'a> {
    batch_id: &'a str,
    timestamp: &'a DateTime<Utc>,
    file_id: &'a str,
    document_metadata: &'a DocumentMetadata,
    validation_result: &'a ValidationResult,
    previous_hash: &'a Option<String>,
}

impl LedgerRecord {
    /// Assemble a record, computing its `record_hash` over the canonical
    /// serialization of the remaining fields.
    pub fn assemble(
        batch_id: String,
        timestamp: DateTime<Utc>,
        document_metadata: DocumentMetadata,
        validation_result: ValidationResult,
        previous_hash: Option<String>,
    ) -> Result<Self, serde_json::Error> {
        let file_id = validation_result.file_id.clone();
        let mut record = Self {
            batch_id,
            timestamp,
            file_id,
            document_metadata,
            validation_result,
            previous_hash,
            record_hash: String::new(),
        };
        record.record_hash = record.compute_hash()?;
        Ok(record)
    }

    /// Recompute the canonical hash of this record's content. Equal to
    /// `record_hash` for an untampered record.
    ///
    /// Routing the payload through [`serde_json::Value`] sorts object keys
    /// lexically at every level, which is the documented canonical form.
    pub fn compute_hash(&self) -> Result<String, serde_json::Error> {
        let payload = HashPayload {
            batch_id: &self.batch_id,
            timestamp: &self.timestamp,
            file_id: &self.file_id,
            document_metadata: &self.document_metadata,
            validation_result: &self.validation_result,
            previous_hash: &self.previous_hash,
        };
        let canonical = serde_json::to_vec(&serde_json::to_value(&payload)?)?;
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Outcome of a full-chain integrity scan. A detected break is a finding,
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub is_valid: bool,
    pub total_records: u64,
    pub checked_records: u64,
    /// 1-based position of the first broken record, if any.
    pub first_invalid_record: Option<u64>,
    pub first_invalid_batch_id: Option<String>,
    pub error: Option<String>,
}

impl IntegrityReport {
    pub fn valid(total_records: u64) -> Self {
        Self {
            is_valid: true,
            total_records,
            checked_records: total_records,
            first_invalid_record: None,
            first_invalid_batch_id: None,
            error: None,
        }
    }

    pub fn broken(
        checked_records: u64,
        position: u64,
        batch_id: Option<String>,
        error: String,
    ) -> Self {
        Self {
            is_valid: false,
            total_records: checked_records,
            checked_records,
            first_invalid_record: Some(position),
            first_invalid_batch_id: batch_id,
            error: Some(error),
        }
    }
}

/// Compute the SHA-256 hex digest of raw document bytes. Used as the
/// deduplication `file_id`.
pub fn hash_document(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
