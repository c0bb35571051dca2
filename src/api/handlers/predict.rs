use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{debug, error};

use crate::api::{state::AppState, types::PredictResponse};
use crate::error::CropError;
use crate::features::FeatureVector;

type PredictResult = std::result::Result<Json<PredictResponse>, (StatusCode, Json<PredictResponse>)>;

fn reject(err: CropError) -> (StatusCode, Json<PredictResponse>) {
    (err.status_code(), Json(PredictResponse::failure(err.to_string())))
}

/// POST /predict
///
/// The body is read as raw bytes so a missing or wrong `Content-Type` does
/// not stop a well-formed JSON payload from being scored.
pub async fn predict_handler(State(state): State<AppState>, body: Bytes) -> PredictResult {
    let features = FeatureVector::from_slice(&body).map_err(|e| {
        debug!(error = %e, "Rejected predict request");
        reject(e)
    })?;

    match Arc::clone(&state.inference).predict_blocking(features).await {
        Ok(crop) => {
            debug!(crop = %crop, "Prediction served");
            Ok(Json(PredictResponse::crop(crop)))
        }
        Err(e) => {
            error!(error = %e, features = ?features.as_slice(), "Prediction error");
            Err(reject(e))
        }
    }
}
