//! Noise filters: Median.
//!
//! ## Supported Formats
//!
//! - **Grayscale**: (height, width) - processes the single channel
//! - **BGR**: (height, width, 3) - processes each channel independently
//!
//! ## Border Handling
//!
//! Neighbors outside the image replicate the nearest edge pixel
//! (coordinates are clamped), the same policy as OpenCV's `medianBlur`.

use ndarray::{Array3, ArrayView3};

use crate::error::Result;
use crate::types::{Image, KernelSize};

// ============================================================================
// Median Filter
// ============================================================================

/// Apply median filter to a (height, width, channels) grid.
///
/// Removes salt-and-pepper noise while preserving edges. Channels are
/// filtered independently.
///
/// # Arguments
/// * `input` - Image grid (height, width, channels)
/// * `ksize` - Side length of the square window
///
/// # Returns
/// Median-filtered grid with the same shape
pub fn median_u8(input: ArrayView3<u8>, ksize: KernelSize) -> Array3<u8> {
    let radius = ksize.radius();
    if radius == 0 {
        return input.to_owned();
    }

    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    let side = ksize.get();
    let mut values: Vec<u8> = Vec::with_capacity(side * side);

    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                values.clear();

                for dy in 0..side {
                    let sy = (y as isize + dy as isize - radius as isize)
                        .clamp(0, height as isize - 1) as usize;

                    for dx in 0..side {
                        let sx = (x as isize + dx as isize - radius as isize)
                            .clamp(0, width as isize - 1) as usize;

                        values.push(input[[sy, sx, c]]);
                    }
                }

                let mid = values.len() / 2;
                let (_, median, _) = values.select_nth_unstable(mid);
                output[[y, x, c]] = *median;
            }
        }
    }

    output
}

/// Median-filter an image with a `ksize` x `ksize` window.
///
/// Fails with `InvalidParameter` if `ksize` is even or larger than
/// [`MAX_KERNEL_SIZE`](crate::types::MAX_KERNEL_SIZE); the check happens
/// before any pixel is touched. A `ksize` of 1 returns a copy.
pub fn median_filter(image: &Image, ksize: usize) -> Result<Image> {
    let ksize = KernelSize::new(ksize)?;
    Ok(Image::from_channels(median_u8(image.view3(), ksize)))
}
