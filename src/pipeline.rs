//! Preprocessing pipeline: equalize, median-filter, equalize again, save.
//!
//! ## Stage Order
//!
//! 1. `equalized = equalize_histogram(original)`
//! 2. `filtered = median_filter(equalized, ksize)`
//! 3. `processed = equalize_histogram(filtered)`
//!
//! The median filter runs on the equalized image, not on the raw input.
//! Both `equalized` and `processed` are written next to each other as
//! `{stem}_equalized{ext}` and `{stem}_processed{ext}`.
//!
//! [`process_directory`] applies [`process_and_save`] to every supported
//! file of a directory. Files are independent and are fanned out over the
//! rayon pool; a failing file is logged and recorded, never fatal.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, error, info};

use crate::error::{PreprocessError, Result};
use crate::filters::{equalize_histogram, median_filter};
use crate::io::{load_image, save_image};
use crate::types::Image;

/// File extensions picked up by [`process_directory`] (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Paths written for one input image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingResult {
    /// Original image after histogram equalization.
    pub equalized_path: PathBuf,
    /// Equalized, median-filtered and equalized again.
    pub processed_path: PathBuf,
}

/// Run the in-memory stages and return `(equalized, processed)`.
pub fn enhance(image: &Image, ksize: usize) -> Result<(Image, Image)> {
    let equalized = equalize_histogram(image);
    let filtered = median_filter(&equalized, ksize)?;
    let processed = equalize_histogram(&filtered);
    Ok((equalized, processed))
}

/// Output file names for `input_path` inside `output_dir`.
///
/// The extension keeps its original spelling; a file without extension
/// gets outputs without extension.
pub fn output_paths(input_path: &Path, output_dir: &Path) -> (PathBuf, PathBuf) {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = input_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (
        output_dir.join(format!("{stem}_equalized{ext}")),
        output_dir.join(format!("{stem}_processed{ext}")),
    )
}

/// Load `input_path`, run the pipeline and save both results into `output_dir`.
///
/// # Errors
/// - `FileNotFound` if `input_path` does not exist (nothing is created)
/// - `Io` if `output_dir` cannot be created or an output cannot be written
/// - `Decode` if the input is not a readable image
/// - `InvalidParameter` if `ksize` is even
///
/// Writes are not transactional: if the second save fails the first file
/// stays on disk.
pub fn process_and_save(
    input_path: &Path,
    output_dir: &Path,
    ksize: usize,
) -> Result<ProcessingResult> {
    if !input_path.exists() {
        return Err(PreprocessError::FileNotFound {
            path: input_path.to_path_buf(),
        });
    }

    fs::create_dir_all(output_dir).map_err(|source| PreprocessError::Directory {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let image = load_image(input_path)?;
    let (height, width, channels) = image.dim();
    debug!(
        path = %input_path.display(),
        height,
        width,
        channels,
        "decoded image"
    );

    let (equalized, processed) = enhance(&image, ksize)?;

    let (equalized_path, processed_path) = output_paths(input_path, output_dir);
    save_image(&equalized, &equalized_path)?;
    save_image(&processed, &processed_path)?;

    info!(
        equalized = %equalized_path.display(),
        processed = %processed_path.display(),
        "images saved"
    );

    Ok(ProcessingResult {
        equalized_path,
        processed_path,
    })
}

/// Whether `path` has one of [`SUPPORTED_EXTENSIONS`].
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| e.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Supported regular files directly inside `input_dir`, sorted by path.
pub fn collect_inputs(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(input_dir).map_err(|source| PreprocessError::Directory {
        path: input_dir.to_path_buf(),
        source,
    })?;

    let mut inputs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_supported(path))
        .collect();
    inputs.sort();
    Ok(inputs)
}

/// Outcome of one file in a batch.
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: Result<ProcessingResult>,
}

/// Per-file outcomes of [`process_directory`], in input path order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }
}

/// Process every supported file in `input_dir` into `output_dir`.
///
/// Only a failure to list `input_dir` is returned as an error; per-file
/// failures are logged and collected in the report.
pub fn process_directory(input_dir: &Path, output_dir: &Path, ksize: usize) -> Result<BatchReport> {
    let inputs = collect_inputs(input_dir)?;
    info!(
        input_dir = %input_dir.display(),
        output_dir = %output_dir.display(),
        files = inputs.len(),
        ksize,
        "processing batch"
    );

    let outcomes: Vec<FileOutcome> = inputs
        .into_par_iter()
        .map(|input| {
            let result = process_and_save(&input, output_dir, ksize);
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match &result {
                Ok(saved) => {
                    info!(file = %name, processed = %saved.processed_path.display(), "done")
                }
                Err(e) => error!(file = %name, error = %e, "failed to process"),
            }
            FileOutcome { input, result }
        })
        .collect();

    let report = BatchReport { outcomes };
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "batch finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_utils::{scratch_dir, write_gray_png};

    fn ramp_rows() -> Vec<u8> {
        let mut data = Vec::new();
        for v in [0u8, 85, 170, 255] {
            data.extend_from_slice(&[v; 4]);
        }
        data
    }

    #[test]
    fn test_output_paths_naming() {
        let (eq, processed) = output_paths(Path::new("/data/raw/scan.01.JPG"), Path::new("out"));
        assert_eq!(eq, PathBuf::from("out/scan.01_equalized.JPG"));
        assert_eq!(processed, PathBuf::from("out/scan.01_processed.JPG"));

        let (eq, _) = output_paths(Path::new("noext"), Path::new("out"));
        assert_eq!(eq, PathBuf::from("out/noext_equalized"));
    }

    #[test]
    fn test_missing_input_creates_nothing() {
        let dir = scratch_dir("pipeline_missing");
        let out = dir.join("out");

        let err = process_and_save(&dir.join("nope.png"), &out, 5).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::FileNotFound);
        assert!(!out.exists());
    }

    #[test]
    fn test_end_to_end_gray_4x4() {
        let dir = scratch_dir("pipeline_e2e");
        let input = dir.join("steps.png");
        write_gray_png(&input, 4, 4, ramp_rows());
        let out = dir.join("nested").join("out");

        let result = process_and_save(&input, &out, 3).unwrap();

        assert_eq!(result.equalized_path, out.join("steps_equalized.png"));
        assert_eq!(result.processed_path, out.join("steps_processed.png"));

        let mut names: Vec<String> = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["steps_equalized.png", "steps_processed.png"]);

        for path in [&result.equalized_path, &result.processed_path] {
            let decoded = image::open(path).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (4, 4));
        }
    }

    #[test]
    fn test_outputs_match_in_memory_stages() {
        let dir = scratch_dir("pipeline_stage_order");
        let input = dir.join("noisy.png");
        let data: Vec<u8> = (0..64u32).map(|i| ((i * 53) % 97 + 60) as u8).collect();
        write_gray_png(&input, 8, 8, data);

        let result = process_and_save(&input, &dir, 3).unwrap();

        let original = load_image(&input).unwrap();
        let (equalized, processed) = enhance(&original, 3).unwrap();
        assert_eq!(load_image(&result.equalized_path).unwrap(), equalized);
        assert_eq!(load_image(&result.processed_path).unwrap(), processed);

        let filtered = median_filter(&equalize_histogram(&original), 3).unwrap();
        let expected = equalize_histogram(&filtered);
        assert_eq!(processed, expected);
    }

    #[test]
    fn test_color_input_stays_color() {
        let dir = scratch_dir("pipeline_color");
        let input = dir.join("color.bmp");
        let rgb =
            image::RgbImage::from_fn(5, 4, |x, y| image::Rgb([(x * 40) as u8, (y * 50) as u8, 90]));
        rgb.save(&input).unwrap();

        let result = process_and_save(&input, &dir.join("out"), 3).unwrap();

        assert_eq!(result.processed_path, dir.join("out").join("color_processed.bmp"));
        let processed = load_image(&result.processed_path).unwrap();
        assert_eq!(processed.dim(), (4, 5, 3));
    }

    #[test]
    fn test_even_kernel_writes_nothing() {
        let dir = scratch_dir("pipeline_even_kernel");
        let input = dir.join("img.png");
        write_gray_png(&input, 4, 4, ramp_rows());
        let out = dir.join("out");

        let err = process_and_save(&input, &out, 4).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_output_dir_is_a_file() {
        let dir = scratch_dir("pipeline_out_is_file");
        let input = dir.join("img.png");
        write_gray_png(&input, 4, 4, ramp_rows());
        let out = dir.join("taken");
        fs::write(&out, b"plain file").unwrap();

        let err = process_and_save(&input, &out, 3).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(matches!(err, PreprocessError::Directory { .. }));
        assert!(out.is_file());
        assert_eq!(fs::read(&out).unwrap(), b"plain file");
        let mut names: Vec<String> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["img.png", "taken"]);
    }

    #[test]
    fn test_undecodable_input() {
        let dir = scratch_dir("pipeline_decode");
        let input = dir.join("fake.jpg");
        fs::write(&input, b"not a jpeg").unwrap();

        let err = process_and_save(&input, &dir.join("out"), 5).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("a.png")));
        assert!(is_supported(Path::new("a.JPEG")));
        assert!(is_supported(Path::new("dir/a.Bmp")));
        assert!(!is_supported(Path::new("a.gif")));
        assert!(!is_supported(Path::new("png")));
    }

    #[test]
    fn test_batch_isolates_failures() {
        let dir = scratch_dir("pipeline_batch");
        let raw = dir.join("raw");
        fs::create_dir_all(&raw).unwrap();
        write_gray_png(&raw.join("a.png"), 4, 4, ramp_rows());
        write_gray_png(&raw.join("C.PNG"), 4, 4, ramp_rows());
        fs::write(raw.join("b.png"), b"garbage").unwrap();
        fs::write(raw.join("notes.txt"), b"skip me").unwrap();
        fs::create_dir_all(raw.join("sub.png")).unwrap();
        let out = dir.join("out");

        let report = process_directory(&raw, &out, 3).unwrap();

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);

        let failure = report.failures().next().unwrap();
        assert_eq!(failure.input, raw.join("b.png"));
        assert_eq!(failure.result.as_ref().unwrap_err().kind(), ErrorKind::Decode);

        assert!(out.join("a_processed.png").exists());
        assert!(out.join("C_equalized.PNG").exists());
        assert!(!out.join("notes_processed.txt").exists());
    }

    #[test]
    fn test_batch_missing_dir_is_io_error() {
        let dir = scratch_dir("pipeline_batch_missing");
        let err = process_directory(&dir.join("absent"), &dir.join("out"), 5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
