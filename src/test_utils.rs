//! Shared helpers for unit tests that touch the filesystem.

use std::path::PathBuf;

/// Fresh, empty directory under the system temp dir, unique per test name
/// and process.
pub(crate) fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "image_preprocess_{}_{}",
        name,
        std::process::id()
    ));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).ok();
    }
    std::fs::create_dir_all(&dir).expect("failed to create scratch dir");
    dir
}

/// Write a grayscale PNG from row-major samples.
pub(crate) fn write_gray_png(path: &std::path::Path, width: u32, height: u32, data: Vec<u8>) {
    image::GrayImage::from_raw(width, height, data)
        .expect("buffer size matches dimensions")
        .save(path)
        .expect("failed to write fixture");
}
