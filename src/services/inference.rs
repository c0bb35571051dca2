//! Process-wide inference context.
//!
//! Built once at startup from the model artifacts and shared read-only by
//! every request. Holds the classifier and the optional label decoder and
//! owns the normalization of raw predictions into crop names.

use std::any::Any;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::ModelConfig;
use crate::error::{CropError, Result};
use crate::features::FeatureVector;
use crate::ml::{Classifier, LabelDecoder, RandomForest, RawLabel};

pub struct InferenceService {
    classifier: Arc<dyn Classifier>,
    decoder: Option<LabelDecoder>,
}

impl std::fmt::Debug for InferenceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceService")
            .field("decoder", &self.decoder)
            .finish_non_exhaustive()
    }
}

impl InferenceService {
    pub fn new(classifier: Arc<dyn Classifier>, decoder: Option<LabelDecoder>) -> Self {
        Self {
            classifier,
            decoder,
        }
    }

    /// Load artifacts from disk.
    ///
    /// A missing or unreadable model is fatal. The label encoder is optional:
    /// if it is absent or fails to load the service runs without decoding.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        if !config.path.exists() {
            error!("Model file not found at: {}", config.path.display());
            return Err(CropError::ModelLoad(format!(
                "model file not found at: {}",
                config.path.display()
            )));
        }

        let model = RandomForest::from_file(&config.path)?;
        info!(
            path = %config.path.display(),
            trees = model.trees.len(),
            classes = model.classes.len(),
            "Model loaded"
        );

        let decoder = match &config.label_encoder_path {
            Some(path) if path.exists() => match LabelDecoder::from_file(path) {
                Ok(decoder) => {
                    info!(
                        path = %path.display(),
                        classes = decoder.classes().len(),
                        "Label encoder loaded"
                    );
                    Some(decoder)
                }
                Err(e) => {
                    warn!("Could not load label encoder: {}", e);
                    None
                }
            },
            Some(path) => {
                debug!("No label encoder at {}, labels are used as-is", path.display());
                None
            }
            None => None,
        };

        Ok(Self::new(Arc::new(model), decoder))
    }

    pub fn has_decoder(&self) -> bool {
        self.decoder.is_some()
    }

    /// Run the classifier and normalize its output.
    pub fn predict(&self, features: &FeatureVector) -> Result<String> {
        let raw = self.classifier.predict(features).map_err(|e| match e {
            CropError::Prediction(_) => e,
            other => CropError::Prediction(other.to_string()),
        })?;
        Ok(self.normalize(raw))
    }

    /// Run [`predict`](Self::predict) on the blocking pool.
    ///
    /// A panic inside the classifier is contained and reported as a
    /// prediction failure.
    pub async fn predict_blocking(self: Arc<Self>, features: FeatureVector) -> Result<String> {
        tokio::task::spawn_blocking(move || self.predict(&features))
            .await
            .map_err(|e| {
                if e.is_panic() {
                    CropError::Prediction(format!(
                        "model panicked: {}",
                        panic_message(e.into_panic())
                    ))
                } else {
                    CropError::Internal(format!("prediction task failed: {e}"))
                }
            })?
    }

    /// Turn a raw label into the crop name returned to callers.
    pub fn normalize(&self, raw: RawLabel) -> String {
        let Some(decoder) = &self.decoder else {
            return raw.to_string();
        };
        match decoder.decode(&raw) {
            Ok(label) => label,
            Err(e) => {
                warn!(raw = %raw, error = %e, "Label decode failed, returning raw label");
                raw.to_string()
            }
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
