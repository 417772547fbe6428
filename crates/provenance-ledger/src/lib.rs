//! Append-only verification ledger with cryptographic hash chaining,
//! plus the consistency-graph builder that compares extracted entities
//! across a shipment's records.
//!
//! The ledger is the unit of truth for "a verification happened". It
//! supports append and read only, never update or delete. Each record
//! links to its predecessor by hash; see `shared_types::ledger` for the
//! canonical hashing scheme.

pub mod batch;
pub mod graph;
pub mod ledger;

pub use batch::BatchId;
pub use graph::ConsistencyGraphBuilder;
pub use ledger::{Ledger, LedgerError};
