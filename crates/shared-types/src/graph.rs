//! Consistency-graph view types.
//!
//! A bipartite graph over one shipment's ledger records: document nodes on
//! one side, distinct extracted field values on the other, with edges typed
//! by whether the document agrees with the group consensus for that field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Document,
    Entity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeType {
    #[serde(rename = "MATCH")]
    Match,
    #[serde(rename = "MISMATCH")]
    Mismatch,
}

/// A document or entity node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub node_type: NodeType,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// A directed document → entity edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub edge_type: EdgeType,
    pub field_name: String,
    pub explanation: String,
}

/// Derived, non-persisted consistency view for one shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyGraph {
    pub shipment_id: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl ConsistencyGraph {
    pub fn mismatch_count(&self) -> usize {
        self.edges
            .iter()
            .filter(|e| e.edge_type == EdgeType::Mismatch)
            .count()
    }
}
