use axum::http::StatusCode;
use thiserror::Error;

/// Main error type for the crop advisor
#[derive(Error, Debug)]
pub enum CropError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    // Startup errors
    #[error("Model load failed: {0}")]
    ModelLoad(String),

    #[error("Label encoder load failed: {0}")]
    LabelEncoderLoad(String),

    // Request errors
    #[error("{0}")]
    MalformedRequest(String),

    #[error("{0}")]
    Validation(String),

    // Inference errors
    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Label decode failed: {0}")]
    LabelDecode(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CropError {
    /// HTTP status a request-level error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CropError::MalformedRequest(_) | CropError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result type alias for CropError
pub type Result<T> = std::result::Result<T, CropError>;
