//! Image preprocessing: median denoising and histogram equalization.
//!
//! Loads raster images, equalizes them, median-filters the equalized image,
//! equalizes again and writes both the equalized original and the fully
//! processed result to disk.
//!
//! ## Image Format
//! - **Grayscale**: (height, width) - single channel
//! - **BGR**: (height, width, 3) - blue, green, red
//!
//! All samples are `u8` (0-255).
//!
//! ## Operations
//! - [`median_filter`]: per-channel median over an odd square window
//! - [`equalize_histogram`]: CDF remapping; luminance only for color images
//! - [`histogram`]: channel-0 histogram for inspection
//! - [`process_and_save`]: the full pipeline for one file
//! - [`process_directory`]: the pipeline for every supported file of a directory
//!
//! Optional bindings: `python` (PyO3/numpy) and `wasm` (wasm-bindgen).

pub mod config;
pub mod error;
pub mod filters;
pub mod io;
pub mod logging;
pub mod pipeline;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

#[cfg(test)]
mod test_utils;

pub use error::{ErrorKind, PreprocessError, Result};
pub use filters::{equalize_histogram, histogram, median_filter};
pub use pipeline::{process_and_save, process_directory, BatchReport, ProcessingResult};
pub use types::{Image, KernelSize};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use std::path::PathBuf;

    use ndarray::{Ix2, Ix3};
    use numpy::{IntoPyArray, PyArrayDyn, PyReadonlyArrayDyn};
    use pyo3::exceptions::{PyFileNotFoundError, PyIOError, PyValueError};
    use pyo3::prelude::*;

    use crate::error::{ErrorKind, PreprocessError};
    use crate::filters;
    use crate::pipeline;
    use crate::types::{Image, Pixels};

    fn to_py_err(err: PreprocessError) -> PyErr {
        match err.kind() {
            ErrorKind::InvalidParameter | ErrorKind::Decode => {
                PyValueError::new_err(err.to_string())
            }
            ErrorKind::FileNotFound => PyFileNotFoundError::new_err(err.to_string()),
            ErrorKind::Io => PyIOError::new_err(err.to_string()),
        }
    }

    fn kernel_size(ksize: i64) -> PyResult<usize> {
        if ksize < 1 {
            return Err(PyValueError::new_err(format!(
                "kernel size must be a positive odd integer, got {ksize}"
            )));
        }
        Ok(ksize as usize)
    }

    fn image_from_array(array: PyReadonlyArrayDyn<'_, u8>) -> PyResult<Image> {
        let owned = array.as_array().to_owned();
        let shape_err = |e: ndarray::ShapeError| PyValueError::new_err(e.to_string());
        match owned.ndim() {
            2 => Image::gray(owned.into_dimensionality::<Ix2>().map_err(shape_err)?)
                .map_err(to_py_err),
            3 => Image::bgr(owned.into_dimensionality::<Ix3>().map_err(shape_err)?)
                .map_err(to_py_err),
            n => Err(PyValueError::new_err(format!(
                "expected a (H, W) or (H, W, 3) uint8 array, got {n} dimensions"
            ))),
        }
    }

    fn image_to_array<'py>(py: Python<'py>, image: Image) -> Bound<'py, PyArrayDyn<u8>> {
        match image.into_pixels() {
            Pixels::Gray(data) => data.into_dyn().into_pyarray(py),
            Pixels::Bgr(data) => data.into_dyn().into_pyarray(py),
        }
    }

    /// Median-filter a (H, W) or (H, W, 3) uint8 image.
    ///
    /// Raises ValueError if `ksize` is even or not positive.
    #[pyfunction]
    #[pyo3(signature = (image, ksize=3))]
    pub fn median_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArrayDyn<'py, u8>,
        ksize: i64,
    ) -> PyResult<Bound<'py, PyArrayDyn<u8>>> {
        let ksize = kernel_size(ksize)?;
        let input = image_from_array(image)?;
        let result = filters::median_filter(&input, ksize).map_err(to_py_err)?;
        Ok(image_to_array(py, result))
    }

    /// Histogram-equalize a grayscale image, or the luminance of a BGR image.
    #[pyfunction]
    pub fn equalize_histogram<'py>(
        py: Python<'py>,
        image: PyReadonlyArrayDyn<'py, u8>,
    ) -> PyResult<Bound<'py, PyArrayDyn<u8>>> {
        let input = image_from_array(image)?;
        Ok(image_to_array(py, filters::equalize_histogram(&input)))
    }

    /// Channel-0 histogram over [0, 256) with `bins` bins.
    #[pyfunction]
    #[pyo3(signature = (image, bins=256))]
    pub fn histogram(image: PyReadonlyArrayDyn<'_, u8>, bins: usize) -> PyResult<Vec<u64>> {
        let input = image_from_array(image)?;
        filters::histogram(&input, bins).map_err(to_py_err)
    }

    /// Run the preprocessing pipeline on one file.
    ///
    /// Returns `(equalized_path, processed_path)`.
    #[pyfunction]
    #[pyo3(signature = (input_path, output_dir, ksize=5))]
    pub fn process_and_save(
        input_path: PathBuf,
        output_dir: PathBuf,
        ksize: i64,
    ) -> PyResult<(PathBuf, PathBuf)> {
        let ksize = kernel_size(ksize)?;
        let result =
            pipeline::process_and_save(&input_path, &output_dir, ksize).map_err(to_py_err)?;
        Ok((result.equalized_path, result.processed_path))
    }

    /// Image preprocessing extension module
    #[pymodule]
    pub fn image_preprocess(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(median_filter, m)?)?;
        m.add_function(wrap_pyfunction!(equalize_histogram, m)?)?;
        m.add_function(wrap_pyfunction!(histogram, m)?)?;
        m.add_function(wrap_pyfunction!(process_and_save, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::image_preprocess;
