//! Append-only JSONL ledger store.
//!
//! One JSON object per line, in append order. The append path is the
//! single serialization point of the whole system: the read-tail /
//! write-record pair must be atomic together, so a `Mutex` owns the
//! cached tail hash for the file's lifetime. Reads scan the file without
//! taking the append lock.
//!
//! Durability discipline: the encoded line is staged to a scratch file
//! and fsynced before being appended to the ledger, which is fsynced in
//! turn. A crash mid-append leaves either the previous tail untouched or
//! one complete, valid record.

use crate::batch::BatchId;
use chrono::Utc;
use shared_types::{DocumentMetadata, IntegrityReport, LedgerRecord, ValidationResult};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("ledger I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("ledger corrupted: {0}")]
    Corrupted(String),
}

pub struct Ledger {
    path: PathBuf,
    /// Cached `record_hash` of the current tail; `None` for an empty
    /// ledger. Guarded so concurrent appends serialize.
    tail: Mutex<Option<String>>,
}

impl Ledger {
    /// Open (or create) the ledger file and recover the current tail.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if !path.exists() {
            File::create(&path)?;
            info!(path = %path.display(), "ledger initialized");
        }

        let tail = Self::recover_tail(&path)?;
        Ok(Self {
            path,
            tail: Mutex::new(tail),
        })
    }

    fn recover_tail(path: &Path) -> Result<Option<String>, LedgerError> {
        let reader = BufReader::new(File::open(path)?);
        let mut tail = None;
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: LedgerRecord = serde_json::from_str(&line)
                .map_err(|e| LedgerError::Corrupted(format!("unreadable tail record: {}", e)))?;
            tail = Some(record.record_hash);
        }
        Ok(tail)
    }

    /// Append a new verification record and return it.
    ///
    /// Generates a fresh batch id, links the record to the current tail
    /// (or the genesis sentinel), and persists it durably before the tail
    /// pointer moves. At most one append runs at a time.
    pub fn append(
        &self,
        document_metadata: DocumentMetadata,
        validation_result: ValidationResult,
    ) -> Result<LedgerRecord, LedgerError> {
        let mut tail = self.tail.lock().unwrap_or_else(|poisoned| {
            // A panic while holding the lock cannot leave a partially
            // appended record; the cached tail is still authoritative.
            poisoned.into_inner()
        });

        let record = LedgerRecord::assemble(
            BatchId::generate(),
            Utc::now(),
            document_metadata,
            validation_result,
            tail.clone(),
        )?;

        let mut line = serde_json::to_string(&record)?;
        line.push('\n');
        self.write_durably(line.as_bytes())?;

        *tail = Some(record.record_hash.clone());
        info!(batch_id = %record.batch_id, "ledger record appended");
        Ok(record)
    }

    /// Stage-then-append so a crash never leaves a torn tail undetected.
    fn write_durably(&self, line: &[u8]) -> Result<(), LedgerError> {
        let scratch = self.path.with_extension("jsonl.staged");
        {
            let mut staged = File::create(&scratch)?;
            staged.write_all(line)?;
            staged.sync_all()?;
        }

        let mut ledger = OpenOptions::new().append(true).open(&self.path)?;
        ledger.write_all(line)?;
        ledger.sync_all()?;

        let _ = std::fs::remove_file(&scratch);
        Ok(())
    }

    /// Look up a record by batch id. O(n) scan of the log.
    pub fn get(&self, batch_id: &str) -> Result<Option<LedgerRecord>, LedgerError> {
        self.find(|record| record.batch_id == batch_id)
    }

    /// Look up a record by content hash; used for upstream deduplication.
    pub fn get_by_file_id(&self, file_id: &str) -> Result<Option<LedgerRecord>, LedgerError> {
        self.find(|record| record.file_id == file_id)
    }

    fn find(
        &self,
        predicate: impl Fn(&LedgerRecord) -> bool,
    ) -> Result<Option<LedgerRecord>, LedgerError> {
        let reader = BufReader::new(File::open(&self.path)?);
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<LedgerRecord>(&line) {
                Ok(record) if predicate(&record) => return Ok(Some(record)),
                Ok(_) => {}
                Err(e) => {
                    // Surfaced as a finding by verify_integrity; reads
                    // skip past it.
                    warn!(error = %e, "skipping unreadable ledger line");
                }
            }
        }
        Ok(None)
    }

    /// The most recent `limit` records, in append order.
    pub fn get_all(&self, limit: usize) -> Result<Vec<LedgerRecord>, LedgerError> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<LedgerRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(error = %e, "skipping unreadable ledger line"),
            }
        }
        if records.len() > limit {
            records.drain(..records.len() - limit);
        }
        Ok(records)
    }

    /// Walk the full chain, recomputing every record hash and checking
    /// every link. Deliberately O(n); the cost of tamper evidence is a
    /// full scan, and it is not cached.
    pub fn verify_integrity(&self) -> Result<IntegrityReport, LedgerError> {
        info!("starting ledger integrity check");
        let reader = BufReader::new(File::open(&self.path)?);

        let mut checked: u64 = 0;
        let mut previous_hash: Option<String> = None;

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let position = checked + 1;

            let record: LedgerRecord = match serde_json::from_str(&line) {
                Ok(record) => record,
                Err(e) => {
                    return Ok(IntegrityReport::broken(
                        position,
                        position,
                        None,
                        format!("malformed record: {}", e),
                    ));
                }
            };
            checked = position;

            let computed = record.compute_hash()?;
            if computed != record.record_hash {
                return Ok(IntegrityReport::broken(
                    checked,
                    position,
                    Some(record.batch_id),
                    "record hash does not match record content".to_string(),
                ));
            }

            if record.previous_hash != previous_hash {
                return Ok(IntegrityReport::broken(
                    checked,
                    position,
                    Some(record.batch_id),
                    "hash chain broken: previous_hash does not match predecessor".to_string(),
                ));
            }

            previous_hash = Some(record.record_hash);
        }

        debug!(records = checked, "ledger integrity check passed");
        Ok(IntegrityReport::valid(checked))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
