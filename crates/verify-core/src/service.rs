//! End-to-end verification service.
//!
//! One instance per process. The anomaly scorer is loaded once at
//! construction and shared read-only across requests; the ledger
//! serializes its own appends. Each upload's pipeline is a sequential
//! computation: parse → features → rules → score → fuse → entities.

use crate::config::CoreConfig;
use crate::error::CoreError;
use provenance_ledger::{ConsistencyGraphBuilder, Ledger};
use shared_parse::{DocumentParser, OcrEngine};
use shared_types::{
    hash_document, ConsistencyGraph, DocumentMetadata, IntegrityReport, LedgerRecord,
    ValidationResult,
};
use std::sync::Arc;
use tracing::{info, warn};
use validation_engine::{
    AnomalyScorer, EntityExtractor, FeatureExtractor, RiskFuser, RuleEngine,
};

/// Characters of extracted text echoed back to the caller.
const EXCERPT_CHARS: usize = 200;

pub struct VerificationService {
    parser: DocumentParser,
    features: FeatureExtractor,
    rules: RuleEngine,
    /// `None` only when the config explicitly allowed rule-only scoring
    /// and the model artifact could not be loaded.
    scorer: Option<Arc<AnomalyScorer>>,
    fuser: RiskFuser,
    entities: EntityExtractor,
    ledger: Ledger,
    graph_builder: ConsistencyGraphBuilder,
    graph_window: usize,
}

impl std::fmt::Debug for VerificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationService")
            .field("has_scorer", &self.scorer.is_some())
            .field("graph_window", &self.graph_window)
            .finish_non_exhaustive()
    }
}

impl VerificationService {
    /// Construct the service, loading the model artifact and opening the
    /// ledger. A missing or corrupt model fails closed here unless
    /// `allow_rule_only_scoring` is set.
    pub fn new(config: CoreConfig) -> Result<Self, CoreError> {
        let parser = DocumentParser::new(config.parser.clone());
        Self::build(config, parser)
    }

    /// Construct with a substitute OCR engine (tests, alternative
    /// backends).
    pub fn with_ocr_engine(
        config: CoreConfig,
        ocr: Arc<dyn OcrEngine>,
    ) -> Result<Self, CoreError> {
        let parser = DocumentParser::with_ocr_engine(config.parser.clone(), ocr);
        Self::build(config, parser)
    }

    fn build(config: CoreConfig, parser: DocumentParser) -> Result<Self, CoreError> {
        let scorer = match AnomalyScorer::load(&config.model_path) {
            Ok(scorer) => Some(Arc::new(scorer)),
            Err(e) if config.allow_rule_only_scoring => {
                warn!(
                    error = %e,
                    "anomaly model unavailable; continuing with rule-only scoring as configured"
                );
                None
            }
            Err(e) => return Err(e.into()),
        };

        let ledger = Ledger::open(&config.ledger_path)?;
        info!(
            ledger = %config.ledger_path.display(),
            model_loaded = scorer.is_some(),
            "verification service ready"
        );

        Ok(Self {
            parser,
            features: FeatureExtractor::new(),
            rules: RuleEngine::new(),
            scorer,
            fuser: RiskFuser::new(config.scoring),
            entities: EntityExtractor::new(),
            ledger,
            graph_builder: ConsistencyGraphBuilder::new(),
            graph_window: config.graph_window,
        })
    }

    /// Run the full validation pipeline on an upload.
    pub fn validate(
        &self,
        bytes: &[u8],
        declared_filename: &str,
        declared_mime: &str,
    ) -> Result<ValidationResult, CoreError> {
        let file_id = hash_document(bytes);
        info!(filename = declared_filename, %file_id, "starting validation");

        let parsed = self.parser.parse(bytes, declared_filename, declared_mime)?;
        let features = self.features.extract(&parsed);
        let violations = self.rules.evaluate(&parsed, &features);
        let anomaly = self.scorer.as_ref().map(|scorer| scorer.score(&features));
        let fused = self.fuser.fuse(anomaly.as_ref(), &violations);
        let extracted_entities = self.entities.extract(&parsed.text);

        let text_excerpt: String = parsed
            .text
            .chars()
            .take(EXCERPT_CHARS)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();

        info!(
            %file_id,
            fraud_score = fused.fraud_score,
            risk_level = ?fused.risk_level,
            "validation complete"
        );

        Ok(ValidationResult {
            file_id,
            fraud_score: fused.fraud_score,
            risk_level: fused.risk_level,
            is_anomaly: fused.is_anomaly,
            rule_violations: violations,
            text_excerpt,
            extracted_entities,
        })
    }

    /// Append a verification to the ledger. The upload counts as
    /// verified only once this returns successfully.
    pub fn record_verification(
        &self,
        document_metadata: DocumentMetadata,
        validation_result: ValidationResult,
    ) -> Result<LedgerRecord, CoreError> {
        Ok(self.ledger.append(document_metadata, validation_result)?)
    }

    /// Look up a ledger record by batch id.
    pub fn lookup(&self, batch_id: &str) -> Result<LedgerRecord, CoreError> {
        self.ledger
            .get(batch_id)?
            .ok_or_else(|| CoreError::RecordNotFound(batch_id.to_string()))
    }

    /// Look up a ledger record by uploaded-content hash (dedup path).
    pub fn lookup_by_file_id(&self, file_id: &str) -> Result<Option<LedgerRecord>, CoreError> {
        Ok(self.ledger.get_by_file_id(file_id)?)
    }

    /// Full-chain integrity scan. O(n) over the ledger by design.
    pub fn check_integrity(&self) -> Result<IntegrityReport, CoreError> {
        Ok(self.ledger.verify_integrity()?)
    }

    /// Build the consistency graph for a shipment key. A record belongs
    /// to the group when its extracted batch id, or its own ledger batch
    /// id, equals the key. Only the most recent `graph_window` records
    /// are considered.
    pub fn consistency_graph(&self, shipment_key: &str) -> Result<ConsistencyGraph, CoreError> {
        let window = self.ledger.get_all(self.graph_window)?;
        let group: Vec<LedgerRecord> = window
            .into_iter()
            .filter(|record| {
                record.batch_id == shipment_key
                    || record
                        .validation_result
                        .extracted_entities
                        .batch_id
                        .as_deref()
                        == Some(shipment_key)
            })
            .collect();

        if group.is_empty() {
            return Err(CoreError::ShipmentNotFound(shipment_key.to_string()));
        }
        Ok(self.graph_builder.build(shipment_key, &group))
    }
}
