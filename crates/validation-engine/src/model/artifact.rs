//! On-disk model artifact.
//!
//! JSON document holding the trained isolation forest (binary trees as
//! node arrays), the standard-scaler parameters fit alongside it, and the
//! calibrated decision threshold.

use crate::model::ModelError;
use serde::{Deserialize, Serialize};
use shared_types::FEATURE_COUNT;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: String,
    /// Feature names in vector order; must match the extractor's layout.
    pub feature_names: Vec<String>,
    pub scaler: ScalerArtifact,
    pub forest: ForestArtifact,
    /// Decision-function values at or below this are outliers.
    pub decision_threshold: f64,
}

/// Standard scaler fit at training time: `(x - mean) / scale` per feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestArtifact {
    /// Subsample size each tree was grown on; normalizes path lengths.
    pub max_samples: u32,
    /// Decision-function offset fit at training time.
    pub offset: f64,
    pub trees: Vec<TreeArtifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeArtifact {
    /// Nodes in preorder; index 0 is the root.
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// Split feature index; `None` marks a leaf.
    pub feature: Option<usize>,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub left: usize,
    #[serde(default)]
    pub right: usize,
    /// Training samples that reached this node.
    pub n_samples: u32,
}

impl ModelArtifact {
    /// Load and validate an artifact. Fails closed on any defect.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::NotFound(path.display().to_string()));
        }
        let raw = std::fs::read_to_string(path)?;
        let artifact: ModelArtifact =
            serde_json::from_str(&raw).map_err(|e| ModelError::Malformed(e.to_string()))?;
        artifact.validate()?;
        info!(
            version = %artifact.version,
            trees = artifact.forest.trees.len(),
            path = %path.display(),
            "anomaly model loaded"
        );
        Ok(artifact)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.feature_names.len() != FEATURE_COUNT {
            return Err(ModelError::FeatureMismatch {
                expected: FEATURE_COUNT,
                actual: self.feature_names.len(),
            });
        }
        if self.scaler.mean.len() != FEATURE_COUNT || self.scaler.scale.len() != FEATURE_COUNT {
            return Err(ModelError::Malformed(
                "scaler parameter length does not match feature count".to_string(),
            ));
        }
        if self.forest.trees.is_empty() {
            return Err(ModelError::Malformed("forest has no trees".to_string()));
        }
        if self.forest.max_samples == 0 {
            return Err(ModelError::Malformed("max_samples must be positive".to_string()));
        }
        for (tree_index, tree) in self.forest.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelError::Malformed(format!(
                    "tree {} has no nodes",
                    tree_index
                )));
            }
            for (node_index, node) in tree.nodes.iter().enumerate() {
                if let Some(feature) = node.feature {
                    if feature >= FEATURE_COUNT {
                        return Err(ModelError::Malformed(format!(
                            "tree {} node {} splits on unknown feature {}",
                            tree_index, node_index, feature
                        )));
                    }
                    if node.left >= tree.nodes.len() || node.right >= tree.nodes.len() {
                        return Err(ModelError::Malformed(format!(
                            "tree {} node {} has out-of-range children",
                            tree_index, node_index
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn leaf(n_samples: u32) -> TreeNode {
        TreeNode {
            feature: None,
            threshold: 0.0,
            left: 0,
            right: 0,
            n_samples,
        }
    }

    fn minimal_artifact() -> ModelArtifact {
        ModelArtifact {
            version: "v1".to_string(),
            feature_names: shared_types::FeatureVector::feature_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            scaler: ScalerArtifact {
                mean: vec![0.0; FEATURE_COUNT],
                scale: vec![1.0; FEATURE_COUNT],
            },
            forest: ForestArtifact {
                max_samples: 256,
                offset: -0.5,
                trees: vec![TreeArtifact {
                    nodes: vec![leaf(256)],
                }],
            },
            decision_threshold: -0.08,
        }
    }

    #[test]
    fn valid_artifact_roundtrips_through_json() {
        let artifact = minimal_artifact();
        artifact.validate().unwrap();
        let json = serde_json::to_string(&artifact).unwrap();
        let restored: ModelArtifact = serde_json::from_str(&json).unwrap();
        restored.validate().unwrap();
    }

    #[test]
    fn wrong_feature_count_is_rejected() {
        let mut artifact = minimal_artifact();
        artifact.feature_names.pop();
        assert!(matches!(
            artifact.validate(),
            Err(ModelError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn out_of_range_children_are_rejected() {
        let mut artifact = minimal_artifact();
        artifact.forest.trees[0].nodes = vec![TreeNode {
            feature: Some(0),
            threshold: 1.0,
            left: 5,
            right: 6,
            n_samples: 256,
        }];
        assert!(matches!(artifact.validate(), Err(ModelError::Malformed(_))));
    }

    #[test]
    fn missing_file_fails_closed() {
        let err = ModelArtifact::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, ModelError::NotFound(_)));
    }
}
