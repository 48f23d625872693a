//! Inference engines that score an input tensor.

use ort::session::Session;
use ort::value::Tensor;

use crate::error::{Error, Result};
use crate::image::InputTensor;

/// Something that maps a preprocessed scan to raw class scores.
///
/// The scores are returned as produced; no softmax or validation is applied.
pub trait InferenceEngine {
    /// Score one input tensor.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails.
    fn infer(&mut self, input: &InputTensor) -> Result<Vec<f32>>;
}

/// ONNX Runtime classifier taking an NHWC `[1, 224, 224, 3]` input.
pub struct OnnxClassifier {
    session: Session,
}

impl OnnxClassifier {
    /// Wrap a loaded session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

impl InferenceEngine for OnnxClassifier {
    fn infer(&mut self, input: &InputTensor) -> Result<Vec<f32>> {
        let input_value =
            Tensor::from_array(input.to_array()?).map_err(|source| Error::Inference { source })?;

        let outputs = self
            .session
            .run(ort::inputs![input_value])
            .map_err(|source| Error::Inference { source })?;

        let output = outputs
            .values()
            .next()
            .ok_or_else(|| Error::ShapeMismatch {
                expected: "class scores output".to_string(),
                actual: "no output".to_string(),
            })?;

        let (_, scores) = output
            .try_extract_tensor::<f32>()
            .map_err(|source| Error::Inference { source })?;

        tracing::debug!("Model scores: {scores:?}");

        Ok(scores.to_vec())
    }
}
