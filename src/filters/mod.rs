//! Filter modules for image preprocessing.
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Grayscale8 | (H, W) | u8 | Single intensity channel, 0-255 |
//! | BGR8 | (H, W, 3) | u8 | Blue, green, red, 0-255 |
//!
//! Internally every filter works on a (H, W, C) view, so grayscale images
//! are handled as a single-channel grid.
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **Pure** - Inputs are borrowed; every filter allocates a new image
//! - **Channel independent** - The median filter treats each channel on its own
//! - **Luminance only** - Color equalization never touches chrominance
//!
//! ## Filter Categories
//!
//! - **Noise**: median
//! - **Tonal**: histogram equalization
//! - **Color space**: BGR <-> YCrCb
//! - **Diagnostics**: histogram

pub mod color_space;
pub mod equalize;
pub mod histogram;
pub mod noise;

pub use equalize::equalize_histogram;
pub use histogram::histogram;
pub use noise::median_filter;
