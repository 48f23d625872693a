//! Image loading utilities.

use std::path::Path;

use image::{imageops::FilterType, DynamicImage, GenericImageView, RgbImage};

use crate::error::{Error, Result};

use super::INPUT_SIZE;

/// Decode an image from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let (width, height) = img.dimensions();
    tracing::debug!("Loaded {} ({width}x{height})", path.display());

    Ok(img)
}

/// Resample an image to the model input size.
///
/// Uses nearest-neighbour sampling with no filtering, so every output pixel
/// is a copy of some source pixel.
#[must_use]
pub fn resample(img: &DynamicImage) -> RgbImage {
    if img.dimensions() == (INPUT_SIZE, INPUT_SIZE) {
        return img.to_rgb8();
    }

    img.resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Nearest)
        .to_rgb8()
}

/// Load a scan from disk and resample it to the model input size.
///
/// # Errors
///
/// Returns an error if the image cannot be loaded.
pub fn load_scan<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let img = load_image(path)?;
    Ok(resample(&img))
}
