//! WebAssembly exports for the preprocessing filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen and take flat,
//! row-major interleaved buffers:
//! - `channels = 1`: grayscale (length = width * height)
//! - `channels = 3`: BGR (length = width * height * 3)
//!
//! Invalid dimensions or parameters are thrown as JS errors.

use wasm_bindgen::prelude::*;

use crate::error::PreprocessError;
use crate::filters::{equalize_histogram, histogram, median_filter};
use crate::types::Image;

fn to_js(err: PreprocessError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn image_from_flat(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Image, JsValue> {
    Image::from_raw(height, width, channels, data.to_vec()).map_err(to_js)
}

// ============================================================================
// Median Filter
// ============================================================================

/// Median-filter a flat 8-bit image.
///
/// # Arguments
/// * `data` - Flat array of samples (length = width * height * channels)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `channels` - 1 (grayscale) or 3 (BGR)
/// * `ksize` - Odd window side length
///
/// # Returns
/// Flat array with the filtered samples
#[wasm_bindgen]
pub fn median_filter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    ksize: usize,
) -> Result<Vec<u8>, JsValue> {
    let input = image_from_flat(data, width, height, channels)?;
    let result = median_filter(&input, ksize).map_err(to_js)?;
    Ok(result.into_raw())
}

// ============================================================================
// Histogram Equalization
// ============================================================================

/// Histogram-equalize a flat 8-bit image (luminance only for BGR).
#[wasm_bindgen]
pub fn equalize_histogram_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Vec<u8>, JsValue> {
    let input = image_from_flat(data, width, height, channels)?;
    Ok(equalize_histogram(&input).into_raw())
}

// ============================================================================
// Histogram
// ============================================================================

/// Channel-0 histogram with `bins` bins; counts are returned as `f64` so
/// they arrive in JS as a `Float64Array`.
#[wasm_bindgen]
pub fn histogram_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    bins: usize,
) -> Result<Vec<f64>, JsValue> {
    let input = image_from_flat(data, width, height, channels)?;
    let counts = histogram(&input, bins).map_err(to_js)?;
    Ok(counts.into_iter().map(|c| c as f64).collect())
}
