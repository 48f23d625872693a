//! Classifier model loading and inference.

mod engine;
mod store;

pub use engine::{InferenceEngine, OnnxClassifier};
pub use store::{ModelStore, MODEL_FILENAME};
