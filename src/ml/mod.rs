//! Model artifacts and inference (deploy-safe, CPU-only).
//!
//! Artifacts are plain JSON exports produced by the training pipeline, so the
//! service runs without Python or a numerical toolchain at deploy time.

pub mod forest;
pub mod label;

pub use forest::{DecisionTree, RandomForest, TreeNode};
pub use label::{LabelDecoder, RawLabel};

use crate::error::Result;
use crate::features::FeatureVector;

/// A loaded, immutable model that can be shared across request tasks.
#[cfg_attr(test, mockall::automock)]
pub trait Classifier: Send + Sync {
    /// Predict the raw class label for one sample.
    fn predict(&self, features: &FeatureVector) -> Result<RawLabel>;
}
