//! Fraud/anomaly validation engine.
//!
//! Turns a parsed document into a risk verdict in four stages: feature
//! extraction, deterministic rule checks, anomaly-model scoring, and
//! fusion of both signals into one 0-100 fraud score. Rules catch known
//! fraud patterns precisely; the model catches novel deviations. Neither
//! signal alone decides the verdict.

pub mod extractors;
pub mod features;
pub mod fusion;
pub mod model;
pub mod patterns;
pub mod rules;

pub use extractors::entities::EntityExtractor;
pub use features::FeatureExtractor;
pub use fusion::{FusedRisk, RiskBands, RiskFuser, ScoringConfig, SeverityPenalties};
pub use model::{AnomalyScore, AnomalyScorer, ModelArtifact, ModelError};
pub use rules::RuleEngine;
