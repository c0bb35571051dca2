//! One-shot prediction for scripts and backends that shell out.
//!
//! Prints `{"predicted_crop": ...}` on success and `{"error": ...}` on
//! failure so callers can parse stdout either way.

use serde_json::json;

use crate::error::{CropError, Result};
use crate::features::FeatureVector;
use crate::services::InferenceService;

/// Validate and score a raw JSON payload.
pub fn predict_once(service: &InferenceService, raw: &str) -> Result<String> {
    if raw.trim().is_empty() {
        return Err(CropError::MalformedRequest(
            "No input data received".to_string(),
        ));
    }
    let features = FeatureVector::from_slice(raw.as_bytes())?;
    service.predict(&features)
}

/// Stdout line and process exit code for an outcome.
pub fn render_outcome(outcome: &anyhow::Result<String>) -> (String, i32) {
    match outcome {
        Ok(crop) => (json!({ "predicted_crop": crop }).to_string(), 0),
        Err(e) => (json!({ "error": format!("{e:#}") }).to_string(), 1),
    }
}
