//! Owned 8-bit image buffers and the median kernel size.
//!
//! - grayscale: shape (height, width)
//! - BGR: shape (height, width, 3), channel order blue, green, red
//!
//! An [`Image`] can only be built through [`Image::gray`], [`Image::bgr`] or
//! [`Image::from_raw`], so every value is non-empty with 1 or 3 channels.
//!
//! Filters work on a uniform (height, width, channels) view obtained through
//! [`Image::view3`]; a grayscale image is seen as a single-channel grid.

use ndarray::{Array2, Array3, ArrayView3, Axis};

use crate::error::{PreprocessError, Result};

/// Default median kernel size of the pipeline.
pub const DEFAULT_KERNEL_SIZE: usize = 5;

/// Largest accepted median kernel size.
pub const MAX_KERNEL_SIZE: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pixels: Pixels,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Pixels {
    Gray(Array2<u8>),
    Bgr(Array3<u8>),
}

impl Image {
    /// Wrap a grayscale grid. Rejects empty grids.
    pub fn gray(data: Array2<u8>) -> Result<Self> {
        let (height, width) = data.dim();
        check_extent(height, width)?;
        Ok(Image {
            pixels: Pixels::Gray(data),
        })
    }

    /// Wrap a BGR grid. Rejects empty grids and channel counts other than 3.
    pub fn bgr(data: Array3<u8>) -> Result<Self> {
        let (height, width, channels) = data.dim();
        check_extent(height, width)?;
        if channels != 3 {
            return Err(PreprocessError::InvalidParameter(format!(
                "color images must have 3 channels, got {channels}"
            )));
        }
        Ok(Image {
            pixels: Pixels::Bgr(data),
        })
    }

    /// Build an image from a row-major interleaved buffer.
    ///
    /// `channels` must be 1 (grayscale) or 3 (BGR).
    pub fn from_raw(height: usize, width: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        let expected = height
            .checked_mul(width)
            .and_then(|n| n.checked_mul(channels))
            .ok_or_else(|| {
                PreprocessError::InvalidParameter(format!(
                    "image dimensions {height}x{width}x{channels} overflow"
                ))
            })?;
        if data.len() != expected {
            return Err(PreprocessError::InvalidParameter(format!(
                "buffer holds {} samples, expected {height}x{width}x{channels} = {expected}",
                data.len()
            )));
        }
        match channels {
            1 => Array2::from_shape_vec((height, width), data)
                .map_err(|e| PreprocessError::InvalidParameter(e.to_string()))
                .and_then(Image::gray),
            3 => Array3::from_shape_vec((height, width, 3), data)
                .map_err(|e| PreprocessError::InvalidParameter(e.to_string()))
                .and_then(Image::bgr),
            n => Err(PreprocessError::InvalidParameter(format!(
                "unsupported channel count {n}, expected 1 or 3"
            ))),
        }
    }

    /// Rebuild an image from a (height, width, channels) grid produced by a
    /// filter. The grid has the shape of a [`view3`](Self::view3) of a valid
    /// image: non-empty, 1 or 3 channels.
    pub(crate) fn from_channels(data: Array3<u8>) -> Self {
        debug_assert!(matches!(data.dim().2, 1 | 3));
        let pixels = if data.dim().2 == 1 {
            Pixels::Gray(data.index_axis_move(Axis(2), 0))
        } else {
            Pixels::Bgr(data)
        };
        Image { pixels }
    }

    pub(crate) fn pixels(&self) -> &Pixels {
        &self.pixels
    }

    pub(crate) fn into_pixels(self) -> Pixels {
        self.pixels
    }

    pub fn height(&self) -> usize {
        self.dim().0
    }

    pub fn width(&self) -> usize {
        self.dim().1
    }

    pub fn channels(&self) -> usize {
        self.dim().2
    }

    /// (height, width, channels)
    pub fn dim(&self) -> (usize, usize, usize) {
        match &self.pixels {
            Pixels::Gray(data) => {
                let (h, w) = data.dim();
                (h, w, 1)
            }
            Pixels::Bgr(data) => data.dim(),
        }
    }

    pub fn is_color(&self) -> bool {
        matches!(self.pixels, Pixels::Bgr(_))
    }

    /// Borrow as a (height, width, channels) view.
    pub fn view3(&self) -> ArrayView3<'_, u8> {
        match &self.pixels {
            Pixels::Gray(data) => data.view().insert_axis(Axis(2)),
            Pixels::Bgr(data) => data.view(),
        }
    }

    /// Row-major interleaved samples.
    pub fn into_raw(self) -> Vec<u8> {
        match self.pixels {
            Pixels::Gray(data) => data.iter().copied().collect(),
            Pixels::Bgr(data) => data.iter().copied().collect(),
        }
    }
}

fn check_extent(height: usize, width: usize) -> Result<()> {
    if height == 0 || width == 0 {
        return Err(PreprocessError::InvalidParameter(format!(
            "image must be non-empty, got {height}x{width}"
        )));
    }
    Ok(())
}

/// Side length of the median filter's square window. Always odd and at
/// most [`MAX_KERNEL_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelSize(usize);

impl KernelSize {
    pub fn new(size: usize) -> Result<Self> {
        if size % 2 == 0 {
            return Err(PreprocessError::InvalidParameter(
                "kernel size must be odd".to_string(),
            ));
        }
        if size > MAX_KERNEL_SIZE {
            return Err(PreprocessError::InvalidParameter(format!(
                "kernel size must be at most {MAX_KERNEL_SIZE}, got {size}"
            )));
        }
        Ok(KernelSize(size))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Distance from the window center to its edge.
    pub fn radius(self) -> usize {
        self.0 / 2
    }
}

impl Default for KernelSize {
    fn default() -> Self {
        KernelSize(DEFAULT_KERNEL_SIZE)
    }
}

impl TryFrom<usize> for KernelSize {
    type Error = PreprocessError;

    fn try_from(size: usize) -> Result<Self> {
        KernelSize::new(size)
    }
}
