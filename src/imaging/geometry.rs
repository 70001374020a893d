//! Display-space geometry for the crop preview.
//!
//! The preview draws the source image scaled to fit its container, centred,
//! with letterbox margins on one axis. The crop frame is authored on top of
//! that drawing, so its coordinates are relative to the *displayed image*
//! (not the container) and measured in display units. [`map_display_crop`]
//! converts such a frame back into an exact pixel rectangle of the source.
//!
//! ```text
//!  container
//! ┌──────────────────────────┐
//! │   ┌──────────────────┐   │  ← displayed image (fit_image_rect)
//! │   │    ┌──────┐      │   │
//! │   │    │ crop │      │   │  ← DisplayCropRect, origin relative to image
//! │   │    └──────┘      │   │
//! │   └──────────────────┘   │
//! └──────────────────────────┘
//! ```

use super::params::{CropOptions, OutputFormat};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("crop preview is not ready")]
    PreviewNotReady,
    #[error("source image has no pixels ({width} × {height})")]
    DegenerateSource { width: u32, height: u32 },
}

/// A size in display units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True unless both axes are strictly positive (NaN counts as empty).
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// A rectangle in display units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// The crop frame as drawn over the displayed image, origin relative to the
/// image's top-left corner.
pub type DisplayCropRect = Rect;

/// A crop rectangle in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn into_options(self, output_format: OutputFormat) -> CropOptions {
        CropOptions {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            output_format,
        }
    }
}

/// Where an image of `image` pixels lands when fitted into `container`.
///
/// Scale is the tighter of the two axis ratios; the result is centred.
/// Returns an all-zero rect when either size is empty.
pub fn fit_image_rect(container: Size, image: Size) -> Rect {
    if container.is_empty() || image.is_empty() {
        return Rect::default();
    }
    let scale = (container.width / image.width).min(container.height / image.height);
    let w = image.width * scale;
    let h = image.height * scale;
    Rect::new(
        (container.width - w) / 2.0,
        (container.height - h) / 2.0,
        w,
        h,
    )
}

/// Display size of a crop frame `frame_width` wide with the ratio of `target`.
pub fn crop_frame_size(frame_width: f64, target: (u32, u32)) -> Size {
    let (target_w, target_h) = target;
    if target_w == 0 {
        return Size::new(frame_width, frame_width);
    }
    Size::new(frame_width, frame_width * (target_h as f64 / target_w as f64))
}

/// Pin a frame of size `frame` inside a displayed image of size `image`.
///
/// The frame keeps its size; only the origin moves, into
/// `[0, max(0, image - frame)]` on each axis.
pub fn clamp_display_crop(rect: DisplayCropRect, image: Size, frame: Size) -> DisplayCropRect {
    let max_x = (image.width - frame.width).max(0.0);
    let max_y = (image.height - frame.height).max(0.0);
    Rect::new(
        rect.x.max(0.0).min(max_x),
        rect.y.max(0.0).min(max_y),
        frame.width,
        frame.height,
    )
}

/// Map a display-space crop frame to a pixel rectangle inside the source.
///
/// `displayed` is the footprint of the rendered image in the same units as
/// `crop`. The result is never empty and always satisfies
/// `x + width <= source_w` and `y + height <= source_h`, even when `crop`
/// overflows the displayed image or rounding pushes it past an edge.
pub fn map_display_crop(
    displayed: Size,
    source: (u32, u32),
    crop: &DisplayCropRect,
) -> Result<PixelRect, GeometryError> {
    let (source_w, source_h) = source;
    if source_w == 0 || source_h == 0 {
        return Err(GeometryError::DegenerateSource {
            width: source_w,
            height: source_h,
        });
    }
    if displayed.is_empty() {
        return Err(GeometryError::PreviewNotReady);
    }

    let scale_x = displayed.width / source_w as f64;
    let scale_y = displayed.height / source_h as f64;
    let scale = scale_x.min(scale_y);
    if !(scale > 0.0) || !scale.is_finite() {
        return Err(GeometryError::PreviewNotReady);
    }

    // `as u32` saturates, so huge or NaN values cannot wrap.
    let mut x = (crop.x / scale).max(0.0).round() as u32;
    let mut y = (crop.y / scale).max(0.0).round() as u32;
    let mut width = (crop.width / scale).max(1.0).round() as u32;
    let mut height = (crop.height / scale).max(1.0).round() as u32;

    if x >= source_w {
        x = source_w - 1;
    }
    if y >= source_h {
        y = source_h - 1;
    }
    width = width.min(source_w - x).max(1);
    height = height.min(source_h - y).max(1);

    Ok(PixelRect {
        x,
        y,
        width,
        height,
    })
}
