//! The engine seam and the pure math that feeds it.
//!
//! | Piece | Role |
//! |---|---|
//! | **Calculations** | Linked width/height derivation (unit testable) |
//! | **Geometry** | Letterbox fit, crop frame clamping, display → pixel mapping |
//! | **Parameters** | Validated requests handed to the engine |
//! | **Backend** | [`ImageBackend`] trait + [`RustBackend`] |

pub mod backend;
mod calculations;
pub mod geometry;
mod params;
pub mod rust_backend;

pub use backend::{ImageBackend, ImageError};
pub use calculations::{derive_height, derive_width};
pub use geometry::{
    DisplayCropRect, GeometryError, PixelRect, Rect, Size, clamp_display_crop, crop_frame_size,
    fit_image_rect, map_display_crop,
};
pub use params::{CropOptions, OutputFormat, ParseChoiceError, ResizeAlgorithm, ResizeOptions};
pub use rust_backend::RustBackend;
