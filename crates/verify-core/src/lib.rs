//! Verification core facade.
//!
//! Wires the document parser, validation engine, and provenance ledger
//! into the interface the routing layer consumes: validate an upload,
//! record the verification, look records up, check ledger integrity, and
//! build shipment consistency graphs.

pub mod config;
pub mod error;
pub mod service;

pub use config::CoreConfig;
pub use error::CoreError;
pub use service::VerificationService;

// The facade's callers deal in these types directly.
pub use shared_types::{
    ConsistencyGraph, DocumentMetadata, DocumentType, IntegrityReport, LedgerRecord,
    ValidationResult,
};
