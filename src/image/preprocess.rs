//! Conversion of a resampled scan into the classifier input tensor.

use image::RgbImage;
use ndarray::Array4;

use crate::error::{Error, Result};

use super::{INPUT_SIZE, RGB_CHANNELS, TENSOR_LEN};

/// Divisor applied to the red channel.
const RED_SCALE: f32 = 255.0;

/// Divisor applied to the green channel.
///
/// The deployed classifier was fed green values scaled by 250, so a fully
/// saturated green channel maps to 1.02. Keep this in step with the model.
const GREEN_SCALE: f32 = 250.0;

/// Divisor applied to the blue channel.
const BLUE_SCALE: f32 = 255.0;

/// Flat classifier input: 224x224 pixels in row-major order, three `f32`
/// values per pixel in R, G, B order.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    data: Vec<f32>,
}

impl InputTensor {
    /// The flat values.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Number of values, always [`TENSOR_LEN`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the tensor holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The three channel values of the pixel at (`x`, `y`).
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is not below [`INPUT_SIZE`].
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        assert!(
            x < INPUT_SIZE && y < INPUT_SIZE,
            "pixel ({x}, {y}) outside {INPUT_SIZE}x{INPUT_SIZE} tensor"
        );
        let start = (y as usize * INPUT_SIZE as usize + x as usize) * RGB_CHANNELS;
        [
            self.data[start],
            self.data[start + 1],
            self.data[start + 2],
        ]
    }

    /// Render the tensor as a native-endian `f32` byte buffer, for engines
    /// that take raw input memory.
    #[must_use]
    pub fn to_ne_bytes(&self) -> Vec<u8> {
        self.data.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }

    /// NHWC array of shape (1, 224, 224, 3) for ONNX Runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be reshaped.
    pub fn to_array(&self) -> Result<Array4<f32>> {
        let size = INPUT_SIZE as usize;
        Array4::from_shape_vec((1, size, size, RGB_CHANNELS), self.data.clone()).map_err(|_| {
            Error::ShapeMismatch {
                expected: format!("(1, {size}, {size}, {RGB_CHANNELS})"),
                actual: format!("{} values", self.data.len()),
            }
        })
    }
}

/// Convert a 224x224 RGB scan into the classifier input tensor.
///
/// Pixels are visited row by row. Red and blue are divided by 255, green
/// by 250.
///
/// # Errors
///
/// Returns [`Error::InvalidImageDimensions`] if the image is not 224x224.
pub fn preprocess(image: &RgbImage) -> Result<InputTensor> {
    let (width, height) = image.dimensions();
    if (width, height) != (INPUT_SIZE, INPUT_SIZE) {
        return Err(Error::InvalidImageDimensions {
            width,
            height,
            expected: INPUT_SIZE,
        });
    }

    let mut data = Vec::with_capacity(TENSOR_LEN);

    // `pixels()` walks the buffer row-major.
    for pixel in image.pixels() {
        let [r, g, b] = pixel.0;
        data.push(f32::from(r) / RED_SCALE);
        data.push(f32::from(g) / GREEN_SCALE);
        data.push(f32::from(b) / BLUE_SCALE);
    }

    Ok(InputTensor { data })
}
