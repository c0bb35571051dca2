pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod ml;
pub mod services;

pub use api::{create_router, AppState};
pub use config::AppConfig;
pub use error::{CropError, Result};
pub use features::{FeatureVector, FEATURE_NAMES};
pub use ml::{Classifier, LabelDecoder, RandomForest, RawLabel};
pub use services::InferenceService;
