//! Consistency-graph construction.
//!
//! Builds the bipartite document/entity graph for one shipment group:
//! one document node per contributing ledger record, one entity node per
//! distinct (field, value) pair, and a typed edge for every assertion.
//!
//! Consensus policy (deterministic by construction):
//! - single-valued fields: the most frequent value wins; on a tie the
//!   value of the earliest record in append order wins;
//! - `dates` (multi-valued): a value asserted by more than half of the
//!   group's documents (or by the only document) is consensus; anything
//!   else is a mismatch.
//! Records are processed in append order and fields in canonical order,
//! so building twice from the same records yields identical graphs.

use shared_types::{ConsistencyGraph, EdgeType, GraphEdge, GraphNode, LedgerRecord, NodeType};
use std::collections::BTreeMap;
use tracing::debug;

/// Single-valued entity fields, in canonical comparison order.
const SINGLE_FIELDS: [&str; 4] = ["batch_id", "exporter", "quantity", "certificate_id"];

pub struct ConsistencyGraphBuilder;

impl ConsistencyGraphBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the graph for `shipment_id` from its contributing records,
    /// given in append order.
    pub fn build(&self, shipment_id: &str, records: &[LedgerRecord]) -> ConsistencyGraph {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut edge_counter = 0usize;

        for record in records {
            let mut metadata = BTreeMap::new();
            metadata.insert("file_id".to_string(), record.file_id.clone());
            metadata.insert(
                "risk_level".to_string(),
                format!("{:?}", record.validation_result.risk_level).to_lowercase(),
            );
            nodes.push(GraphNode {
                id: doc_node_id(record),
                label: record.document_metadata.filename.clone(),
                node_type: NodeType::Document,
                metadata,
            });
        }

        for field in SINGLE_FIELDS {
            let assertions: Vec<(&LedgerRecord, &str)> = records
                .iter()
                .filter_map(|record| field_value(record, field).map(|value| (record, value)))
                .collect();
            if assertions.is_empty() {
                continue;
            }

            let consensus = consensus_value(&assertions);
            add_entity_nodes(&mut nodes, field, assertions.iter().map(|(_, v)| *v));

            for (record, value) in &assertions {
                let edge_type = if *value == consensus {
                    EdgeType::Match
                } else {
                    EdgeType::Mismatch
                };
                let explanation = match edge_type {
                    EdgeType::Match => format!(
                        "{} \"{}\" agrees with the group consensus",
                        field, value
                    ),
                    EdgeType::Mismatch => {
                        let holders = assertions
                            .iter()
                            .filter(|(_, v)| *v == consensus)
                            .map(|(r, _)| r.document_metadata.filename.as_str())
                            .collect::<Vec<_>>()
                            .join(", ");
                        format!(
                            "{} \"{}\" in {} conflicts with consensus \"{}\" reported by {}",
                            field, value, record.document_metadata.filename, consensus, holders
                        )
                    }
                };
                edge_counter += 1;
                edges.push(GraphEdge {
                    id: format!("e{}", edge_counter),
                    source: doc_node_id(record),
                    target: entity_node_id(field, value),
                    edge_type,
                    field_name: field.to_string(),
                    explanation,
                });
            }
        }

        // Dates are multi-valued: compare each distinct value against how
        // many documents assert it.
        let date_assertions: Vec<(&LedgerRecord, &str)> = records
            .iter()
            .flat_map(|record| {
                record
                    .validation_result
                    .extracted_entities
                    .dates
                    .iter()
                    .map(move |d| (record, d.as_str()))
            })
            .collect();
        if !date_assertions.is_empty() {
            add_entity_nodes(&mut nodes, "dates", date_assertions.iter().map(|(_, v)| *v));
            let total_documents = records.len();

            for (record, value) in &date_assertions {
                let holders: Vec<&str> = records
                    .iter()
                    .filter(|r| {
                        r.validation_result
                            .extracted_entities
                            .dates
                            .iter()
                            .any(|d| d == value)
                    })
                    .map(|r| r.document_metadata.filename.as_str())
                    .collect();
                let is_consensus = total_documents == 1 || holders.len() * 2 > total_documents;
                let (edge_type, explanation) = if is_consensus {
                    (
                        EdgeType::Match,
                        format!("date \"{}\" is shared by the group", value),
                    )
                } else {
                    (
                        EdgeType::Mismatch,
                        format!(
                            "date \"{}\" appears in only {} of {} documents ({})",
                            value,
                            holders.len(),
                            total_documents,
                            holders.join(", ")
                        ),
                    )
                };
                edge_counter += 1;
                edges.push(GraphEdge {
                    id: format!("e{}", edge_counter),
                    source: doc_node_id(record),
                    target: entity_node_id("dates", value),
                    edge_type,
                    field_name: "dates".to_string(),
                    explanation,
                });
            }
        }

        debug!(
            shipment_id,
            documents = records.len(),
            nodes = nodes.len(),
            edges = edges.len(),
            "consistency graph built"
        );

        ConsistencyGraph {
            shipment_id: shipment_id.to_string(),
            nodes,
            edges,
        }
    }
}

impl Default for ConsistencyGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn doc_node_id(record: &LedgerRecord) -> String {
    format!("doc:{}", record.batch_id)
}

fn entity_node_id(field: &str, value: &str) -> String {
    format!("entity:{}:{}", field, value)
}

fn field_value<'a>(record: &'a LedgerRecord, field: &str) -> Option<&'a str> {
    let entities = &record.validation_result.extracted_entities;
    match field {
        "batch_id" => entities.batch_id.as_deref(),
        "exporter" => entities.exporter.as_deref(),
        "quantity" => entities.quantity.as_deref(),
        "certificate_id" => entities.certificate_id.as_deref(),
        _ => None,
    }
}

/// One entity node per distinct value, in first-seen order.
fn add_entity_nodes<'a>(
    nodes: &mut Vec<GraphNode>,
    field: &str,
    values: impl Iterator<Item = &'a str>,
) {
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
            nodes.push(GraphNode {
                id: entity_node_id(field, value),
                label: value.to_string(),
                node_type: NodeType::Entity,
                metadata: BTreeMap::from([("field".to_string(), field.to_string())]),
            });
        }
    }
}

/// Most frequent value; ties resolve to the value seen earliest in append
/// order.
fn consensus_value<'a>(assertions: &[(&LedgerRecord, &'a str)]) -> &'a str {
    let mut tally: Vec<(&'a str, usize)> = Vec::new();
    for (_, value) in assertions {
        if let Some(entry) = tally.iter_mut().find(|entry| entry.0 == *value) {
            entry.1 += 1;
        } else {
            tally.push((*value, 1));
        }
    }
    // Strict comparison over first-seen order keeps the earliest value
    // among ties.
    let mut best = tally[0];
    for candidate in &tally[1..] {
        if candidate.1 > best.1 {
            best = *candidate;
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use shared_types::{
        DocumentMetadata, DocumentType, ExtractedEntities, RiskLevel, ValidationResult,
    };

    fn record(batch_id: &str, filename: &str, entities: ExtractedEntities) -> LedgerRecord {
        LedgerRecord::assemble(
            batch_id.to_string(),
            Utc.with_ymd_and_hms(2026, 2, 7, 12, 0, 0).unwrap(),
            DocumentMetadata::new(filename, DocumentType::Pdf, 1024),
            ValidationResult {
                file_id: format!("file-{}", filename),
                fraud_score: 10.0,
                risk_level: RiskLevel::Low,
                is_anomaly: false,
                rule_violations: vec![],
                text_excerpt: String::new(),
                extracted_entities: entities,
            },
            None,
        )
        .unwrap()
    }

    fn exporter_entities(batch: &str, exporter: &str) -> ExtractedEntities {
        ExtractedEntities {
            batch_id: Some(batch.to_string()),
            exporter: Some(exporter.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn majority_exporter_flags_the_outlier() {
        let records = vec![
            record("BATCH-1", "invoice.pdf", exporter_entities("LOT-9", "Acme Foods")),
            record("BATCH-2", "packing.pdf", exporter_entities("LOT-9", "Acme Foods")),
            record("BATCH-3", "cert_scan.pdf", exporter_entities("LOT-9", "Acme Food Co")),
        ];
        let graph = ConsistencyGraphBuilder::new().build("LOT-9", &records);

        let exporter_edges: Vec<&GraphEdge> = graph
            .edges
            .iter()
            .filter(|e| e.field_name == "exporter")
            .collect();
        assert_eq!(exporter_edges.len(), 3);

        let mismatches: Vec<&&GraphEdge> = exporter_edges
            .iter()
            .filter(|e| e.edge_type == EdgeType::Mismatch)
            .collect();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].source, "doc:BATCH-3");
        assert!(mismatches[0].explanation.contains("Acme Food Co"));
        assert!(mismatches[0].explanation.contains("Acme Foods"));

        // Two distinct exporter values, two entity nodes.
        let exporter_nodes = graph
            .nodes
            .iter()
            .filter(|n| n.id.starts_with("entity:exporter:"))
            .count();
        assert_eq!(exporter_nodes, 2);
    }

    #[test]
    fn agreeing_documents_produce_only_matches() {
        let records = vec![
            record("BATCH-1", "a.pdf", exporter_entities("LOT-9", "Acme Foods")),
            record("BATCH-2", "b.pdf", exporter_entities("LOT-9", "Acme Foods")),
        ];
        let graph = ConsistencyGraphBuilder::new().build("LOT-9", &records);
        assert_eq!(graph.mismatch_count(), 0);
        assert!(graph.edges.iter().all(|e| e.edge_type == EdgeType::Match));
    }

    #[test]
    fn even_split_resolves_to_earliest_record() {
        let records = vec![
            record("BATCH-1", "a.pdf", exporter_entities("LOT-9", "Acme Foods")),
            record("BATCH-2", "b.pdf", exporter_entities("LOT-9", "Acme Food Co")),
        ];
        let graph = ConsistencyGraphBuilder::new().build("LOT-9", &records);

        let mismatches: Vec<&GraphEdge> = graph
            .edges
            .iter()
            .filter(|e| e.field_name == "exporter" && e.edge_type == EdgeType::Mismatch)
            .collect();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].source, "doc:BATCH-2");
    }

    #[test]
    fn shared_dates_match_unique_dates_mismatch() {
        let mut first = exporter_entities("LOT-9", "Acme Foods");
        first.dates = vec!["2026-01-15".to_string()];
        let mut second = exporter_entities("LOT-9", "Acme Foods");
        second.dates = vec!["2026-01-15".to_string(), "2026-02-01".to_string()];
        let mut third = exporter_entities("LOT-9", "Acme Foods");
        third.dates = vec!["2026-01-15".to_string()];

        let records = vec![
            record("BATCH-1", "a.pdf", first),
            record("BATCH-2", "b.pdf", second),
            record("BATCH-3", "c.pdf", third),
        ];
        let graph = ConsistencyGraphBuilder::new().build("LOT-9", &records);

        let date_edges: Vec<&GraphEdge> = graph
            .edges
            .iter()
            .filter(|e| e.field_name == "dates")
            .collect();
        assert_eq!(date_edges.len(), 4);
        let mismatched: Vec<&&GraphEdge> = date_edges
            .iter()
            .filter(|e| e.edge_type == EdgeType::Mismatch)
            .collect();
        assert_eq!(mismatched.len(), 1);
        assert!(mismatched[0].explanation.contains("2026-02-01"));
    }

    #[test]
    fn absent_fields_produce_no_nodes_or_edges() {
        let records = vec![record("BATCH-1", "a.pdf", ExtractedEntities::default())];
        let graph = ConsistencyGraphBuilder::new().build("LOT-9", &records);
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn building_twice_is_idempotent() {
        let records = vec![
            record("BATCH-1", "a.pdf", exporter_entities("LOT-9", "Acme Foods")),
            record("BATCH-2", "b.pdf", exporter_entities("LOT-9", "Acme Food Co")),
        ];
        let builder = ConsistencyGraphBuilder::new();
        assert_eq!(builder.build("LOT-9", &records), builder.build("LOT-9", &records));
    }
}
