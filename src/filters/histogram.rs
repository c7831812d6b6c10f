//! Intensity histograms.
//!
//! `histogram` is a diagnostics helper (channel 0 only, fixed range [0, 256)).
//! `compute_histogram_u8` is the 256-bin counterpart used by equalization.

use ndarray::ArrayView3;

use crate::error::{PreprocessError, Result};
use crate::types::Image;

/// Default bin count of [`histogram`].
pub const DEFAULT_BINS: usize = 256;

/// Compute a 256-bin histogram for one channel.
pub fn compute_histogram_u8(input: ArrayView3<u8>, channel: usize) -> [u64; 256] {
    let (height, width, _) = input.dim();
    let mut hist = [0u64; 256];

    for y in 0..height {
        for x in 0..width {
            let v = input[[y, x, channel]] as usize;
            hist[v] += 1;
        }
    }
    hist
}

/// Histogram of channel 0 over the range [0, 256), split into `bins` equal bins.
///
/// For a BGR image channel 0 is blue. Fails with `InvalidParameter` when
/// `bins` is zero or larger than 256.
pub fn histogram(image: &Image, bins: usize) -> Result<Vec<u64>> {
    if bins == 0 {
        return Err(PreprocessError::InvalidParameter(
            "histogram needs at least one bin".to_string(),
        ));
    }
    if bins > DEFAULT_BINS {
        return Err(PreprocessError::InvalidParameter(format!(
            "histogram of 8-bit samples takes at most {DEFAULT_BINS} bins, got {bins}"
        )));
    }

    let full = compute_histogram_u8(image.view3(), 0);
    if bins == 256 {
        return Ok(full.to_vec());
    }

    let mut counts = vec![0u64; bins];
    for (value, &count) in full.iter().enumerate() {
        counts[value * bins / 256] += count;
    }
    Ok(counts)
}
