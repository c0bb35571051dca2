//! Random forest inference (CPU-only).
//!
//! Loads a JSON export of a trained tree ensemble:
//! - split nodes send a sample left when `x[feature] <= threshold`
//! - leaf nodes carry per-class weights (counts or probabilities)
//!
//! Prediction averages the per-tree class probabilities and picks the first
//! class with the highest mean.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CropError, Result};
use crate::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::ml::{Classifier, RawLabel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Node 0 is the root.
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn validate(&self, n_features: usize, n_classes: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {idx} splits on feature {feature}, expected < {n_features}"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {idx} threshold is not finite"));
                    }
                    // Children strictly after parents: walks always terminate.
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!(
                                "node {idx} child {child} out of range ({} nodes)",
                                self.nodes.len()
                            ));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(format!(
                            "leaf {idx} has {} weights, expected {n_classes}",
                            value.len()
                        ));
                    }
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(format!("leaf {idx} weights must be finite and >= 0"));
                    }
                    if value.iter().sum::<f64>() <= 0.0 {
                        return Err(format!("leaf {idx} weights sum to zero"));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf_for(&self, x: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,

    /// Column names the model was trained on, when the exporter recorded them.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,

    pub classes: Vec<RawLabel>,

    pub trees: Vec<DecisionTree>,

    /// Optional free-form metadata (versioning, training info, etc).
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl RandomForest {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CropError::ModelLoad(format!("{}: {e}", path.display())))?;
        let model: Self = serde_json::from_str(&content)
            .map_err(|e| CropError::ModelLoad(format!("{}: {e}", path.display())))?;
        model.validate().map_err(CropError::ModelLoad)?;
        Ok(model)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.n_features != FEATURE_COUNT {
            return Err(format!(
                "n_features {} != {FEATURE_COUNT}",
                self.n_features
            ));
        }
        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES) {
                return Err(format!(
                    "feature_names {names:?} do not match {FEATURE_NAMES:?}"
                ));
            }
        }
        if self.classes.is_empty() {
            return Err("classes must not be empty".to_string());
        }
        if self.trees.is_empty() {
            return Err("trees must not be empty".to_string());
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.classes.len())
                .map_err(|e| format!("tree[{t}]: {e}"))?;
        }
        Ok(())
    }

    /// Mean class probabilities over all trees.
    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>> {
        if x.len() != self.n_features {
            return Err(CropError::Prediction(format!(
                "input dim mismatch: got {}, expected {}",
                x.len(),
                self.n_features
            )));
        }
        if let Some(pos) = x.iter().position(|v| !v.is_finite()) {
            return Err(CropError::Prediction(format!(
                "input contains non-finite value for '{}'",
                FEATURE_NAMES.get(pos).copied().unwrap_or("?")
            )));
        }

        let mut proba = vec![0.0_f64; self.classes.len()];
        for tree in &self.trees {
            let leaf = tree.leaf_for(x);
            let total: f64 = leaf.iter().sum();
            for (p, w) in proba.iter_mut().zip(leaf) {
                *p += w / total;
            }
        }
        let n_trees = self.trees.len() as f64;
        for p in &mut proba {
            *p /= n_trees;
        }
        Ok(proba)
    }

    pub fn predict_raw(&self, x: &[f64]) -> Result<RawLabel> {
        let proba = self.predict_proba(x)?;
        let mut best = 0;
        for (idx, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = idx;
            }
        }
        Ok(self.classes[best].clone())
    }
}

impl Classifier for RandomForest {
    fn predict(&self, features: &FeatureVector) -> Result<RawLabel> {
        self.predict_raw(features.as_slice())
    }
}
