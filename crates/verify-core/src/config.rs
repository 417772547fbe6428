//! Typed configuration for the verification core.

use serde::{Deserialize, Serialize};
use shared_parse::ParserConfig;
use std::path::PathBuf;
use validation_engine::ScoringConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    pub parser: ParserConfig,
    pub scoring: ScoringConfig,
    /// Anomaly model artifact (JSON) loaded once at startup.
    pub model_path: PathBuf,
    /// Append-only ledger file (JSONL).
    pub ledger_path: PathBuf,
    /// Explicit opt-in to keep serving with rule-only scoring when the
    /// model artifact cannot be loaded. Off by default: a missing model
    /// fails startup.
    pub allow_rule_only_scoring: bool,
    /// Ledger records scanned when grouping a shipment for the
    /// consistency graph.
    pub graph_window: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            scoring: ScoringConfig::default(),
            model_path: PathBuf::from("models/anomaly_model_v1.json"),
            ledger_path: PathBuf::from("data/ledger.jsonl"),
            allow_rule_only_scoring: false,
            graph_window: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fail_closed_on_missing_model() {
        let config = CoreConfig::default();
        assert!(!config.allow_rule_only_scoring);
        assert_eq!(config.graph_window, 1000);
    }
}
