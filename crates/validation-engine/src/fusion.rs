//! Risk fusion: one verdict from two signals.
//!
//! The model's anomaly score sets a 0-100 baseline; rule violations add
//! severity-scaled penalties on top, capped at 100. Critical rules are
//! hard gates: a single critical violation forces the critical risk level
//! no matter what the model said.

use crate::model::scorer::AnomalyScore;
use serde::{Deserialize, Serialize};
use shared_types::{RiskLevel, RuleViolation, Severity};
use tracing::debug;

/// Penalty added to the fraud score per violation, by severity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityPenalties {
    pub critical: f64,
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl SeverityPenalties {
    pub fn for_severity(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

impl Default for SeverityPenalties {
    fn default() -> Self {
        Self {
            critical: 15.0,
            high: 10.0,
            medium: 5.0,
            low: 2.0,
        }
    }
}

/// Fraud-score thresholds for the discrete risk levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskBands {
    pub critical: f64,
    pub high: f64,
    pub medium: f64,
}

impl RiskBands {
    pub fn classify(&self, fraud_score: f64) -> RiskLevel {
        if fraud_score >= self.critical {
            RiskLevel::Critical
        } else if fraud_score >= self.high {
            RiskLevel::High
        } else if fraud_score >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            critical: 75.0,
            high: 60.0,
            medium: 40.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub penalties: SeverityPenalties,
    pub bands: RiskBands,
}

/// Fused verdict for one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusedRisk {
    pub fraud_score: f64,
    pub risk_level: RiskLevel,
    pub is_anomaly: bool,
}

pub struct RiskFuser {
    config: ScoringConfig,
}

impl RiskFuser {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Fuse the anomaly score and rule violations. `anomaly` is `None`
    /// only when the caller explicitly opted into rule-only scoring; the
    /// baseline is then zero and the verdict rests on penalties alone.
    pub fn fuse(&self, anomaly: Option<&AnomalyScore>, violations: &[RuleViolation]) -> FusedRisk {
        let baseline = anomaly.map(|a| 100.0 * a.normalized).unwrap_or(0.0);
        let penalty: f64 = violations
            .iter()
            .map(|v| self.config.penalties.for_severity(v.severity))
            .sum();
        let fraud_score = (baseline + penalty).clamp(0.0, 100.0);

        let mut risk_level = self.config.bands.classify(fraud_score);
        if violations.iter().any(|v| v.severity == Severity::Critical) {
            risk_level = RiskLevel::Critical;
        }

        let is_anomaly = anomaly.map(|a| a.is_outlier).unwrap_or(false)
            || matches!(risk_level, RiskLevel::High | RiskLevel::Critical);

        debug!(
            fraud_score,
            risk_level = ?risk_level,
            violations = violations.len(),
            "risk fused"
        );

        FusedRisk {
            fraud_score,
            risk_level,
            is_anomaly,
        }
    }
}

impl Default for RiskFuser {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}
