//! Locating and loading the classifier model.

use std::path::{Path, PathBuf};

use ort::session::Session;

use crate::error::{Error, Result};

/// File name of the classifier inside the model directory.
pub const MODEL_FILENAME: &str = "lung_classifier.onnx";

/// Resolves where the classifier model lives and opens sessions on it.
pub struct ModelStore {
    model_dir: PathBuf,
}

impl ModelStore {
    /// Create a store rooted at the platform model directory.
    ///
    /// Uses the platform-appropriate cache directory:
    /// - Windows: `%LOCALAPPDATA%\lungscan\models`
    /// - Linux: `~/.cache/lungscan/models`
    /// - macOS: `~/Library/Caches/lungscan/models`
    ///
    /// Nothing is created on disk; the directory only has to exist when the
    /// default model path is used.
    #[must_use]
    pub fn new() -> Self {
        let base = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::with_dir(base.join("lungscan").join("models"))
    }

    /// Create a store rooted at `model_dir`.
    #[must_use]
    pub fn with_dir(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
        }
    }

    /// Path the classifier is expected at when none is given explicitly.
    #[must_use]
    pub fn default_model_path(&self) -> PathBuf {
        self.model_dir.join(MODEL_FILENAME)
    }

    /// Resolve the model file, preferring an explicit path.
    ///
    /// An explicit path never consults the model directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelNotFound`] if the resolved file does not exist.
    pub fn locate(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        let path = explicit.map_or_else(|| self.default_model_path(), Path::to_path_buf);

        if !path.is_file() {
            return Err(Error::ModelNotFound { path });
        }

        Ok(path)
    }

    /// Load an ONNX model session.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded.
    pub fn load_session(&self, path: &Path, intra_threads: usize) -> Result<Session> {
        tracing::info!("Loading classifier from {}", path.display());

        let model_error = |source: ort::Error| Error::ModelLoad {
            path: path.to_path_buf(),
            source,
        };

        Session::builder()
            .map_err(|e| model_error(e.into()))?
            .with_intra_threads(intra_threads)
            .map_err(|e| model_error(e.into()))?
            .commit_from_file(path)
            .map_err(|e| model_error(e.into()))
    }
}
