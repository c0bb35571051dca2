use crate::services::InferenceService;
use std::sync::Arc;

/// Shared application state for API handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Loaded model and optional label decoder, immutable after startup
    pub inference: Arc<InferenceService>,
}

impl AppState {
    pub fn new(inference: InferenceService) -> Self {
        Self {
            inference: Arc::new(inference),
        }
    }

    /// A state value only exists once the model artifact has loaded.
    pub fn model_loaded(&self) -> bool {
        true
    }
}
