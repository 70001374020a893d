//! Pure calculation functions for linked dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Rounding is `f64::round` (half away from zero) in both directions, and every
//! result is clamped into `MIN_DIMENSION..=MAX_DIMENSION`.

use crate::dimension::{MAX_DIMENSION, MIN_DIMENSION};

fn scale_and_clamp(value: u32, numerator: u32, denominator: u32) -> u32 {
    let ratio = numerator as f64 / denominator as f64;
    let computed = (value as f64 * ratio).round();
    computed.clamp(MIN_DIMENSION as f64, MAX_DIMENSION as f64) as u32
}

/// Height that keeps `source_w:source_h` at the given target width.
///
/// Returns `None` when the width is absent or the source has no width.
///
/// ```
/// # use imgrs::imaging::derive_height;
/// assert_eq!(derive_height(4000, 3000, Some(1024)), Some(768));
/// ```
pub fn derive_height(source_w: u32, source_h: u32, target_w: Option<u32>) -> Option<u32> {
    if source_w == 0 {
        return None;
    }
    target_w.map(|w| scale_and_clamp(w, source_h, source_w))
}

/// Width that keeps `source_w:source_h` at the given target height.
///
/// Mirror of [`derive_height`]; `None` when the height is absent or the
/// source has no height.
pub fn derive_width(source_w: u32, source_h: u32, target_h: Option<u32>) -> Option<u32> {
    if source_h == 0 {
        return None;
    }
    target_h.map(|h| scale_and_clamp(h, source_w, source_h))
}
