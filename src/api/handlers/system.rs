use axum::{extract::State, Json};

use crate::api::{state::AppState, types::*};

/// GET / -- liveness
pub async fn root_handler() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        message: "Crop recommendation API running".to_string(),
    })
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: state.model_loaded(),
    })
}
