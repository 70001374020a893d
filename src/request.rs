//! The validation gate in front of the engine.
//!
//! [`build_resize`] and [`build_crop`] read the current [`Session`] and either
//! produce an immutable options value for one engine call or explain what is
//! wrong. Nothing here performs I/O; a failure never reaches the engine.

use crate::dimension::{Axis, DimensionError};
use crate::imaging::{CropOptions, GeometryError, ResizeOptions, map_display_crop};
use crate::session::Session;
use crate::types::ImageDescriptor;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Please select an image")]
    NoImage,
    #[error("Please choose an output location")]
    NoOutput,
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(#[from] DimensionError),
    #[error("Crop preview is not ready yet")]
    PreviewNotReady,
    #[error("Image has no pixels ({width} × {height})")]
    DegenerateImage { width: u32, height: u32 },
}

impl From<GeometryError> for RequestError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::PreviewNotReady => RequestError::PreviewNotReady,
            GeometryError::DegenerateSource { width, height } => {
                RequestError::DegenerateImage { width, height }
            }
        }
    }
}

fn require_image_and_output(session: &Session) -> Result<&ImageDescriptor, RequestError> {
    let image = session.image().ok_or(RequestError::NoImage)?;
    if session.input_path().is_none() {
        return Err(RequestError::NoImage);
    }
    if session.output_path().is_none() {
        return Err(RequestError::NoOutput);
    }
    Ok(image)
}

/// Validate the resize fields.
///
/// Width must parse into `1..=9999`. With the aspect lock off, height must
/// too; with it on, height is left for the engine to derive.
pub fn build_resize(session: &Session) -> Result<ResizeOptions, RequestError> {
    require_image_and_output(session)?;
    let dims = session.dimensions();

    let width = dims.width.check(Axis::Width)?;
    let height = if dims.locked {
        None
    } else {
        Some(dims.height.check(Axis::Height)?)
    };

    Ok(ResizeOptions {
        width,
        height,
        algorithm: session.algorithm(),
        output_format: session.resize_format(),
    })
}

/// Map the crop frame to source pixels and validate it.
///
/// Needs a non-degenerate source and a crop preview that has been laid out
/// at least once (a non-empty displayed image size).
pub fn build_crop(session: &Session) -> Result<CropOptions, RequestError> {
    let image = require_image_and_output(session)?;
    let (width, height) = image.dimensions();
    if image.is_degenerate() {
        return Err(RequestError::DegenerateImage { width, height });
    }
    if session.displayed_image_size().is_empty() {
        return Err(RequestError::PreviewNotReady);
    }

    let rect = map_display_crop(
        session.displayed_image_size(),
        (width, height),
        &session.crop_rect(),
    )?;
    Ok(rect.into_options(session.crop_format()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{OutputFormat, Size};
    use crate::session::Session;
    use crate::test_helpers::*;

    #[test]
    fn resize_requires_an_image() {
        let session = Session::default();
        assert_eq!(build_resize(&session), Err(RequestError::NoImage));
    }

    #[test]
    fn resize_requires_an_output() {
        let mut session = session_with_image(4000, 3000);
        session.clear_output_path();
        assert_eq!(build_resize(&session), Err(RequestError::NoOutput));
    }

    #[test]
    fn resize_locked_omits_height() {
        let mut session = session_with_image(4000, 3000);
        session.edit_width("1024");

        let opts = build_resize(&session).unwrap();
        assert_eq!(opts.width, 1024);
        assert_eq!(opts.height, None);
    }

    #[test]
    fn resize_unlocked_sends_height() {
        let mut session = session_with_image(4000, 3000);
        session.toggle_lock();
        session.edit_width("1024");
        session.edit_height("500");

        let opts = build_resize(&session).unwrap();
        assert_eq!((opts.width, opts.height), (1024, Some(500)));
    }

    #[test]
    fn resize_width_bounds() {
        let mut session = session_with_image(4000, 3000);

        session.edit_width("0");
        assert!(matches!(
            build_resize(&session),
            Err(RequestError::InvalidDimensions(DimensionError::BelowMinimum { .. }))
        ));

        session.edit_width("10000");
        assert!(matches!(
            build_resize(&session),
            Err(RequestError::InvalidDimensions(DimensionError::AboveMaximum { .. }))
        ));

        session.edit_width("9999");
        assert_eq!(build_resize(&session).unwrap().width, 9999);
    }

    #[test]
    fn resize_empty_width_is_invalid() {
        let mut session = session_with_image(4000, 3000);
        session.edit_width("");
        let err = build_resize(&session).unwrap_err();
        assert_eq!(err.to_string(), "Invalid dimensions: width is empty or not a number");
    }

    #[test]
    fn resize_overlong_width_names_the_bound() {
        let mut session = session_with_image(4000, 3000);
        session.edit_width("99999999999");
        let err = build_resize(&session).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid dimensions: width must be at most 9999, got 99999999999"
        );
    }

    #[test]
    fn resize_unlocked_checks_height_bounds() {
        let mut session = session_with_image(4000, 3000);
        session.toggle_lock();
        session.edit_height("10000");
        let err = build_resize(&session).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid dimensions: height must be at most 9999, got 10000"
        );
    }

    #[test]
    fn resize_carries_algorithm_and_format() {
        let mut session = session_with_image(100, 100);
        session.set_algorithm(crate::imaging::ResizeAlgorithm::Nearest);
        session.set_resize_format(OutputFormat::Webp);
        let opts = build_resize(&session).unwrap();
        assert_eq!(opts.algorithm, crate::imaging::ResizeAlgorithm::Nearest);
        assert_eq!(opts.output_format, OutputFormat::Webp);
    }

    #[test]
    fn crop_without_preview_is_not_ready() {
        let session = session_with_image(856, 836);
        assert_eq!(build_crop(&session), Err(RequestError::PreviewNotReady));
    }

    #[test]
    fn crop_without_image_is_distinct_from_not_ready() {
        let mut session = Session::default();
        session.move_crop_to(Size::new(428.0, 418.0), 0.0, 0.0);
        assert_eq!(build_crop(&session), Err(RequestError::NoImage));
    }

    #[test]
    fn crop_on_degenerate_image() {
        let session = session_with_image(0, 836);
        assert_eq!(
            build_crop(&session),
            Err(RequestError::DegenerateImage {
                width: 0,
                height: 836
            })
        );
    }

    #[test]
    fn crop_maps_frame_to_pixels() {
        let mut session = session_with_image(856, 836);
        session.set_crop_format(OutputFormat::Png);
        session.move_crop_to(Size::new(428.0, 418.0), 100.0, 100.0);

        let opts = build_crop(&session).unwrap();
        assert_eq!((opts.x, opts.y), (200, 200));
        assert_eq!(opts.width, 400);
        assert!(opts.x + opts.width <= 856);
        assert!(opts.y + opts.height <= 836);
        assert_eq!(opts.output_format, OutputFormat::Png);
    }

    #[test]
    fn geometry_errors_convert() {
        assert_eq!(
            RequestError::from(GeometryError::PreviewNotReady),
            RequestError::PreviewNotReady
        );
    }
}
