//! Custom error types for lungscan.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the lungscan library.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to load an image file.
    #[error("failed to load image from {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Image handed to the preprocessor is not the model input size.
    #[error("invalid image dimensions {width}x{height}: expected {expected}x{expected}")]
    InvalidImageDimensions {
        width: u32,
        height: u32,
        expected: u32,
    },

    /// Probability vector does not have one score per class.
    #[error("invalid probability vector: expected {expected} scores, got {actual}")]
    InvalidInput { expected: usize, actual: usize },

    /// No model file at the resolved location.
    #[error("model file not found at {path}")]
    ModelNotFound { path: PathBuf },

    /// Failed to load an ONNX model.
    #[error("failed to load ONNX model {path}: {source}")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: ort::Error,
    },

    /// Model inference failed.
    #[error("model inference failed: {source}")]
    Inference {
        #[source]
        source: ort::Error,
    },

    /// Shape mismatch in tensor operations.
    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The classification worker is no longer running.
    #[error("classification worker has stopped")]
    WorkerStopped,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for lungscan operations.
pub type Result<T> = std::result::Result<T, Error>;
