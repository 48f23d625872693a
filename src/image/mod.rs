//! Scan loading and model input preprocessing.

mod load;
mod preprocess;

pub use load::{load_image, load_scan, resample};
pub use preprocess::{preprocess, InputTensor};

/// Side length of the square model input, in pixels.
pub const INPUT_SIZE: u32 = 224;

/// Number of channels in RGB images.
pub const RGB_CHANNELS: usize = 3;

/// Number of values in a preprocessed input tensor (224 * 224 * 3).
pub const TENSOR_LEN: usize = INPUT_SIZE as usize * INPUT_SIZE as usize * RGB_CHANNELS;
