//! Facade error taxonomy.
//!
//! Parse failures and unsupported formats surface to the caller as
//! request errors; a missing model is fatal at construction unless
//! rule-only scoring was explicitly allowed; a failed ledger append means
//! the upload was **not** verified. Integrity findings are data, not
//! errors, and never appear here.

use provenance_ledger::LedgerError;
use shared_parse::ParseError;
use thiserror::Error;
use validation_engine::ModelError;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("batch id not found: {0}")]
    RecordNotFound(String),

    #[error("no records found for shipment: {0}")]
    ShipmentNotFound(String),
}
