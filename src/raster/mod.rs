//! Bridges between `image` rasters and the `(H × W × 3)` arrays the compressors work on.
//!
//! Decoding and encoding files stays with the caller; these helpers only reshape pixel
//! buffers and drop alpha.

use anyhow::anyhow;
use image::{DynamicImage, RgbImage};
use ndarray::{Array3, ArrayView3};

use crate::eigen::NalgebraEigen;
use crate::error::PcaError;
use crate::rgb::{ImageAnalysis, ImageCompressor};

/// Converts any decoded image to an RGB array, discarding alpha and expanding gray.
pub fn rgb_array_from_image(image: &DynamicImage) -> anyhow::Result<Array3<u8>> {
    rgb_array_from_rgb_image(image.to_rgb8())
}

pub fn rgb_array_from_rgb_image(image: RgbImage) -> anyhow::Result<Array3<u8>> {
    let (width, height) = image.dimensions();
    let array = Array3::from_shape_vec((height as usize, width as usize, 3), image.into_raw())?;
    Ok(array)
}

pub fn image_from_rgb_array(array: ArrayView3<u8>) -> anyhow::Result<RgbImage> {
    let (rows, cols, channels) = array.dim();
    if channels != 3 {
        return Err(PcaError::NotRgb { channels }.into());
    }
    let width = u32::try_from(cols)?;
    let height = u32::try_from(rows)?;

    // `iter` walks in logical row-major order, which is the interleaved RGB layout.
    let raw: Vec<u8> = array.iter().copied().collect();
    RgbImage::from_raw(width, height, raw)
        .ok_or_else(|| anyhow!("Pixel buffer does not fit a {}x{} RGB image", width, height))
}

/// Converts, compresses every plane to `requested_k` components, and converts back.
pub fn compress_dynamic_image(image: &DynamicImage, requested_k: i64) -> anyhow::Result<RgbImage> {
    let array = rgb_array_from_image(image)?;
    let compressor: ImageCompressor<NalgebraEigen> = ImageCompressor::default();
    let compression = compressor.compress(array.view(), requested_k)?;
    image_from_rgb_array(compression.image.view())
}

/// Analyzes a copy of `image` shrunk to fit within `max_side` pixels; smaller images are
/// analyzed as they are. Keeps the covariance small enough to inspect.
pub fn analyze_preview(image: &DynamicImage, max_side: u32) -> anyhow::Result<ImageAnalysis> {
    let max_side = max_side.max(1);
    let preview = if image.width() > max_side || image.height() > max_side {
        image.thumbnail(max_side, max_side)
    } else {
        image.clone()
    };

    let array = rgb_array_from_image(&preview)?;
    let compressor: ImageCompressor<NalgebraEigen> = ImageCompressor::default();
    compressor.analyze(array.view())
}
