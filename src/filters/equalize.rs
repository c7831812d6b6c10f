//! Histogram equalization.
//!
//! - **Grayscale**: remaps intensities through the normalized CDF
//! - **BGR**: converts to YCrCb, equalizes only Y, converts back. Cr and Cb
//!   are never touched, so hue and color balance survive. Equalizing B, G
//!   and R independently would shift the color balance and is not offered.

use ndarray::{Array3, ArrayView3};

use super::color_space::{bgr_to_ycrcb_u8, ycrcb_to_bgr_u8};
use super::histogram::compute_histogram_u8;
use crate::types::{Image, Pixels};

/// Build the equalization lookup table for a 256-bin histogram.
///
/// `lut[v] = round((cdf(v) - cdf_min) / (total - cdf_min) * 255)` for every
/// occupied level `v`, where `cdf_min` is the CDF at the lowest occupied
/// level. A histogram with a single occupied level yields the identity table.
pub fn equalization_lut(hist: &[u64; 256]) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (v, entry) in lut.iter_mut().enumerate() {
        *entry = v as u8;
    }

    let total: u64 = hist.iter().sum();
    let Some(first) = hist.iter().position(|&count| count > 0) else {
        return lut;
    };
    let cdf_min = hist[first];
    if cdf_min == total {
        return lut;
    }

    let scale = 255.0 / (total - cdf_min) as f64;
    let mut cdf = 0u64;
    for (v, &count) in hist.iter().enumerate() {
        cdf += count;
        lut[v] = if v < first {
            0
        } else {
            ((cdf - cdf_min) as f64 * scale).round().clamp(0.0, 255.0) as u8
        };
    }
    lut
}

/// Equalize one channel of a (height, width, channels) grid; the other
/// channels are copied unchanged.
pub fn equalize_channel_u8(input: ArrayView3<u8>, channel: usize) -> Array3<u8> {
    let lut = equalization_lut(&compute_histogram_u8(input, channel));

    let mut output = input.to_owned();
    let (height, width, _) = input.dim();
    for y in 0..height {
        for x in 0..width {
            let v = output[[y, x, channel]];
            output[[y, x, channel]] = lut[v as usize];
        }
    }
    output
}

/// Equalize the histogram of an image.
///
/// Grayscale images are equalized directly; BGR images are equalized on
/// luminance only. The output has the same shape as the input.
pub fn equalize_histogram(image: &Image) -> Image {
    match image.pixels() {
        Pixels::Gray(_) => Image::from_channels(equalize_channel_u8(image.view3(), 0)),
        Pixels::Bgr(data) => {
            let ycrcb = bgr_to_ycrcb_u8(data.view());
            let equalized = equalize_channel_u8(ycrcb.view(), 0);
            Image::from_channels(ycrcb_to_bgr_u8(equalized.view()))
        }
    }
}
