//! Image file decode/encode on top of the `image` crate.
//!
//! - `load_image`: read a PNG/JPEG/BMP/etc. into an [`Image`]. Luma files
//!   stay grayscale, everything else becomes 3-channel BGR (alpha dropped).
//! - `save_image`: write an [`Image`]; the container format follows the
//!   file extension.
use std::path::Path;

use image::error::{DecodingError, ImageFormatHint};
use image::{ColorType, DynamicImage, GrayImage, ImageError, ImageReader, Rgb, RgbImage};
use ndarray::{Array2, Array3};

use crate::error::{PreprocessError, Result};
use crate::types::{Image, Pixels};

/// Decode the image at `path`.
///
/// The format is sniffed from the file content, falling back to the
/// extension. Any failure, including an image without pixels, is a
/// `Decode` error.
pub fn load_image(path: &Path) -> Result<Image> {
    let decode_err = |source: ImageError| PreprocessError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let decoded = ImageReader::open(path)
        .map_err(|e| decode_err(ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_err(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)?;

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(decode_err(ImageError::Decoding(DecodingError::new(
            ImageFormatHint::Unknown,
            "image has no pixels",
        ))));
    }

    from_dynamic(decoded)
}

/// Convert a decoded image into a grayscale or BGR [`Image`].
pub fn from_dynamic(decoded: DynamicImage) -> Result<Image> {
    let width = decoded.width() as usize;
    let height = decoded.height() as usize;

    match decoded.color() {
        ColorType::L8 | ColorType::L16 | ColorType::La8 | ColorType::La16 => {
            let raw = decoded.into_luma8().into_raw();
            let data = Array2::from_shape_vec((height, width), raw)
                .map_err(|e| PreprocessError::InvalidParameter(e.to_string()))?;
            Image::gray(data)
        }
        _ => {
            let rgb = decoded.into_rgb8();
            let mut data = Array3::<u8>::zeros((height, width, 3));
            for (x, y, px) in rgb.enumerate_pixels() {
                let (x, y) = (x as usize, y as usize);
                data[[y, x, 0]] = px[2];
                data[[y, x, 1]] = px[1];
                data[[y, x, 2]] = px[0];
            }
            Image::bgr(data)
        }
    }
}

/// Convert an [`Image`] into a `DynamicImage` (BGR becomes RGB).
pub fn to_dynamic(image: &Image) -> Result<DynamicImage> {
    let (height, width, _) = image.dim();
    match image.pixels() {
        Pixels::Gray(data) => {
            let raw: Vec<u8> = data.iter().copied().collect();
            GrayImage::from_raw(width as u32, height as u32, raw)
                .map(DynamicImage::ImageLuma8)
                .ok_or_else(|| {
                    PreprocessError::InvalidParameter("failed to create image buffer".to_string())
                })
        }
        Pixels::Bgr(data) => {
            let rgb = RgbImage::from_fn(width as u32, height as u32, |x, y| {
                let (x, y) = (x as usize, y as usize);
                Rgb([data[[y, x, 2]], data[[y, x, 1]], data[[y, x, 0]]])
            });
            Ok(DynamicImage::ImageRgb8(rgb))
        }
    }
}

/// Encode `image` to `path`. The parent directory must exist.
pub fn save_image(image: &Image, path: &Path) -> Result<()> {
    to_dynamic(image)?
        .save(path)
        .map_err(|source| PreprocessError::Write {
            path: path.to_path_buf(),
            source,
        })
}
