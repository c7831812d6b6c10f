//! BGR <-> YCrCb conversion for 8-bit images.
//!
//! Full-range BT.601 coefficients, the same ones OpenCV uses for
//! `COLOR_BGR2YCrCb` / `COLOR_YCrCb2BGR` on `u8` data:
//!
//! | Channel | Formula |
//! |---------|---------|
//! | Y  | 0.299 R + 0.587 G + 0.114 B |
//! | Cr | (R - Y) * 0.713 + 128 |
//! | Cb | (B - Y) * 0.564 + 128 |
//!
//! Converted grids keep the (height, width, 3) layout with channel order
//! Y, Cr, Cb.

use ndarray::{Array3, ArrayView3};

const KR: f32 = 0.299;
const KG: f32 = 0.587;
const KB: f32 = 0.114;
const CR_SCALE: f32 = 0.713;
const CB_SCALE: f32 = 0.564;
const CHROMA_OFFSET: f32 = 128.0;

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Convert one BGR pixel to (Y, Cr, Cb).
#[inline]
pub fn bgr_to_ycrcb(b: u8, g: u8, r: u8) -> (u8, u8, u8) {
    let (b, g, r) = (b as f32, g as f32, r as f32);
    let y = KR * r + KG * g + KB * b;
    let cr = (r - y) * CR_SCALE + CHROMA_OFFSET;
    let cb = (b - y) * CB_SCALE + CHROMA_OFFSET;
    (to_u8(y), to_u8(cr), to_u8(cb))
}

/// Convert one (Y, Cr, Cb) pixel to BGR.
#[inline]
pub fn ycrcb_to_bgr(y: u8, cr: u8, cb: u8) -> (u8, u8, u8) {
    let y = y as f32;
    let cr = cr as f32 - CHROMA_OFFSET;
    let cb = cb as f32 - CHROMA_OFFSET;
    let r = y + 1.403 * cr;
    let g = y - 0.714 * cr - 0.344 * cb;
    let b = y + 1.773 * cb;
    (to_u8(b), to_u8(g), to_u8(r))
}

/// Convert a BGR grid (height, width, 3) to YCrCb.
pub fn bgr_to_ycrcb_u8(input: ArrayView3<u8>) -> Array3<u8> {
    let (height, width, _) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, 3));

    for y in 0..height {
        for x in 0..width {
            let (luma, cr, cb) =
                bgr_to_ycrcb(input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]]);
            output[[y, x, 0]] = luma;
            output[[y, x, 1]] = cr;
            output[[y, x, 2]] = cb;
        }
    }

    output
}

/// Convert a YCrCb grid (height, width, 3) back to BGR.
pub fn ycrcb_to_bgr_u8(input: ArrayView3<u8>) -> Array3<u8> {
    let (height, width, _) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, 3));

    for y in 0..height {
        for x in 0..width {
            let (b, g, r) =
                ycrcb_to_bgr(input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]]);
            output[[y, x, 0]] = b;
            output[[y, x, 1]] = g;
            output[[y, x, 2]] = r;
        }
    }

    output
}
