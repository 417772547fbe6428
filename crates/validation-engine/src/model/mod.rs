//! Pre-trained anomaly model: artifact format, loading, and scoring.
//!
//! The model is an isolation forest exported at training time together
//! with its feature scaler. Both are loaded once at process start and
//! shared read-only for the process lifetime; there is no online
//! retraining in the request path. A missing or corrupt artifact fails
//! closed at load time; falling back to rule-only scoring is the
//! caller's explicit decision, never this module's.

pub mod artifact;
pub mod scorer;

pub use artifact::{ForestArtifact, ModelArtifact, ScalerArtifact, TreeArtifact, TreeNode};
pub use scorer::{AnomalyScore, AnomalyScorer};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model artifact not found: {0}")]
    NotFound(String),

    #[error("model artifact malformed: {0}")]
    Malformed(String),

    #[error("model declares {actual} features, pipeline produces {expected}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("I/O error reading model artifact: {0}")]
    Io(#[from] std::io::Error),
}
