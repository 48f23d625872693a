//! Scan classification pipeline.

use std::path::{Path, PathBuf};

use ::image::DynamicImage;

use crate::error::{Error, Result};
use crate::image::{self, InputTensor};
use crate::model::{InferenceEngine, ModelStore, OnnxClassifier};
use crate::verdict::{self, Verdict};

/// Configuration for the classification pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model file. None for the default location in the model directory.
    pub model_path: Option<PathBuf>,

    /// Threads ONNX Runtime may use within one inference.
    pub intra_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: None,
            intra_threads: 1,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.intra_threads == 0 {
            return Err(Error::InvalidParameter {
                name: "intra_threads".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Runs scans through preprocessing, inference and verdict resolution.
pub struct Pipeline<E = OnnxClassifier> {
    engine: E,
}

impl Pipeline<OnnxClassifier> {
    /// Create a pipeline backed by the ONNX classifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the model cannot
    /// be found or loaded.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        tracing::info!("Initializing pipeline with config: {config:?}");

        let store = ModelStore::new();
        let path = store.locate(config.model_path.as_deref())?;
        let session = store.load_session(&path, config.intra_threads)?;

        tracing::info!("Pipeline initialized successfully");

        Ok(Self::with_engine(OnnxClassifier::new(session)))
    }
}

impl<E: InferenceEngine> Pipeline<E> {
    /// Create a pipeline over any inference engine.
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    /// Classify an already preprocessed tensor.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails or yields the wrong number of
    /// scores.
    pub fn classify_tensor(&mut self, tensor: &InputTensor) -> Result<Verdict> {
        let scores = self.engine.infer(tensor)?;
        verdict::resolve(&scores)
    }

    /// Classify a decoded image of any size.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails.
    pub fn classify_image(&mut self, img: &DynamicImage) -> Result<Verdict> {
        let scan = image::resample(img);
        let tensor = image::preprocess(&scan)?;
        self.classify_tensor(&tensor)
    }

    /// Load and classify a scan file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be decoded or inference fails.
    pub fn classify_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Verdict> {
        let path = path.as_ref();

        tracing::info!("Classifying scan: {}", path.display());

        let scan = image::load_scan(path)?;
        let tensor = image::preprocess(&scan)?;
        self.classify_tensor(&tensor)
    }
}
