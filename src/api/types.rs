use serde::{Deserialize, Serialize};

// ============================================================================
// System Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

// ============================================================================
// Prediction Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_crop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictResponse {
    pub fn crop(label: impl Into<String>) -> Self {
        Self {
            success: true,
            recommended_crop: Some(label.into()),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            recommended_crop: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_predict_response_shapes() {
        assert_eq!(
            serde_json::to_value(PredictResponse::crop("rice")).unwrap(),
            json!({"success": true, "recommended_crop": "rice"})
        );
        assert_eq!(
            serde_json::to_value(PredictResponse::failure("Missing fields: N")).unwrap(),
            json!({"success": false, "error": "Missing fields: N"})
        );
    }
}
