//! Tree ensemble regressors loaded from JSON exports.
//!
//! The artifact mirrors scikit-learn's flattened tree arrays, so a fitted
//! `RandomForestRegressor` or `GradientBoostingRegressor` can be dumped
//! with a few lines of Python and served without a Python runtime:
//!
//! ```json
//! {
//!   "model_type": "RandomForestRegressor",
//!   "n_features_in": 105,
//!   "aggregation": "mean",
//!   "estimators": [
//!     {
//!       "children_left":  [1, -1, -1],
//!       "children_right": [2, -1, -1],
//!       "feature":        [2, -2, -2],
//!       "threshold":      [4.5, -2.0, -2.0],
//!       "value":          [0.0, 399.0, 649.0]
//!     }
//!   ]
//! }
//! ```
//!
//! A node is a leaf when its left child is `-1`. Otherwise the walk goes
//! left when `x[feature] <= threshold`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Scorer;
use crate::error::{PricecastError, Result};
use crate::types::ModelInfo;

/// How per-tree outputs combine into one prediction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Average of tree outputs (random forests).
    #[default]
    Mean,
    /// `base_score + learning_rate * sum` (gradient boosting).
    Sum,
}

#[derive(Debug, Deserialize)]
struct EnsembleArtifact {
    #[serde(default = "default_model_type")]
    model_type: String,
    n_features_in: usize,
    #[serde(default)]
    aggregation: Aggregation,
    #[serde(default)]
    base_score: f64,
    #[serde(default = "default_learning_rate")]
    learning_rate: f64,
    estimators: Vec<TreeArtifact>,
}

fn default_model_type() -> String {
    "RandomForestRegressor".to_string()
}

fn default_learning_rate() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
struct TreeArtifact {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<f64>,
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(f64),
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn from_artifact(idx: usize, tree: TreeArtifact, width: usize) -> Result<Self> {
        let len = tree.children_left.len();
        if len == 0 {
            return Err(invalid(idx, "tree has no nodes"));
        }
        if [
            tree.children_right.len(),
            tree.feature.len(),
            tree.threshold.len(),
            tree.value.len(),
        ]
        .iter()
        .any(|&n| n != len)
        {
            return Err(invalid(idx, "node arrays have different lengths"));
        }

        let mut nodes = Vec::with_capacity(len);
        for node in 0..len {
            let (left, right) = (tree.children_left[node], tree.children_right[node]);
            if left == -1 {
                let value = tree.value[node];
                if !value.is_finite() {
                    return Err(invalid(idx, format!("leaf {node} has a non-finite value")));
                }
                nodes.push(Node::Leaf(value));
                continue;
            }

            // Children always follow their parent, so every walk terminates.
            let child = |c: i64| -> Result<usize> {
                usize::try_from(c)
                    .ok()
                    .filter(|&c| c > node && c < len)
                    .ok_or_else(|| invalid(idx, format!("node {node} has invalid child {c}")))
            };
            let feature = usize::try_from(tree.feature[node])
                .ok()
                .filter(|&f| f < width)
                .ok_or_else(|| {
                    invalid(
                        idx,
                        format!(
                            "node {node} splits on feature {} outside width {width}",
                            tree.feature[node]
                        ),
                    )
                })?;
            let threshold = tree.threshold[node];
            if threshold.is_nan() {
                return Err(invalid(idx, format!("node {node} has a NaN threshold")));
            }
            nodes.push(Node::Split {
                feature,
                threshold,
                left: child(left)?,
                right: child(right)?,
            });
        }
        Ok(Self { nodes })
    }

    fn predict(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[feature] <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

fn invalid(tree: usize, reason: impl std::fmt::Display) -> PricecastError {
    PricecastError::ModelLoad(format!("estimator {tree}: {reason}"))
}

/// A validated tree ensemble regressor.
///
/// Scoring is a pure walk over immutable nodes, so one instance serves
/// concurrent requests without locking.
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    model_type: String,
    width: usize,
    aggregation: Aggregation,
    base_score: f64,
    learning_rate: f64,
    trees: Vec<Tree>,
}

impl TreeEnsemble {
    /// Read and validate an ensemble from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PricecastError::ModelLoad(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate an ensemble from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        let artifact: EnsembleArtifact = serde_json::from_str(content)
            .map_err(|e| PricecastError::ModelLoad(format!("failed to parse model: {e}")))?;

        if artifact.n_features_in == 0 {
            return Err(PricecastError::ModelLoad(
                "n_features_in must be positive".to_string(),
            ));
        }
        if artifact.estimators.is_empty() {
            return Err(PricecastError::ModelLoad(
                "model has no estimators".to_string(),
            ));
        }
        if !artifact.base_score.is_finite() || !artifact.learning_rate.is_finite() {
            return Err(PricecastError::ModelLoad(
                "base_score and learning_rate must be finite".to_string(),
            ));
        }

        let width = artifact.n_features_in;
        let trees = artifact
            .estimators
            .into_iter()
            .enumerate()
            .map(|(idx, tree)| Tree::from_artifact(idx, tree, width))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            model_type: artifact.model_type,
            width,
            aggregation: artifact.aggregation,
            base_score: artifact.base_score,
            learning_rate: artifact.learning_rate,
            trees,
        })
    }

    /// Number of trees.
    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }
}

impl Scorer for TreeEnsemble {
    fn info(&self) -> ModelInfo {
        ModelInfo::new(&self.model_type, self.width).with_estimators(self.trees.len())
    }

    fn expected_width(&self) -> usize {
        self.width
    }

    fn score(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.width {
            return Err(PricecastError::DimensionMismatch {
                expected: self.width,
                actual: features.len(),
            });
        }
        let total: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        Ok(match self.aggregation {
            Aggregation::Mean => total / self.trees.len() as f64,
            Aggregation::Sum => self.base_score + self.learning_rate * total,
        })
    }
}
