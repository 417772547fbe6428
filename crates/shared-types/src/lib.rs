pub mod graph;
pub mod ledger;
pub mod types;

pub use graph::{ConsistencyGraph, EdgeType, GraphEdge, GraphNode, NodeType};
pub use ledger::{hash_document, IntegrityReport, LedgerRecord};
pub use types::feature_index;
pub use types::{
    DocumentMetadata, DocumentType, ExtractedEntities, FeatureVector, ParsedDocument, RiskLevel,
    RuleViolation, Severity, TableShape, ValidationResult, FEATURE_COUNT,
};
