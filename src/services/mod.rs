pub mod inference;

pub use inference::InferenceService;
