//! Image engine trait and its error taxonomy.
//!
//! The [`ImageBackend`] trait is the whole contract between the core and the
//! component that touches pixels: probe, resize, crop, and the list of formats
//! it can read. The core never decodes or encodes anything itself; it only
//! hands validated [`ResizeOptions`] / [`CropOptions`] across this seam.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording mock in [`tests`].

use super::params::{CropOptions, ResizeOptions};
use crate::types::ImageDescriptor;
use std::path::Path;
use thiserror::Error;

/// Failures reported by an engine.
///
/// - `Io`: the file could not be read or written. Recoverable by picking a
///   different input or output.
/// - `UnsupportedFormat`: the file was recognised but has no usable codec.
///   Terminal for that file.
/// - `InvalidDimensions`: the engine rejected the requested geometry.
/// - `Processing`: the engine failed mid-operation. Terminal for that attempt.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
    #[error("Processing error: {0}")]
    Processing(String),
}

/// An image-processing engine.
///
/// Implementations own all file I/O. `Sync` so a dispatched operation can run
/// on a worker thread while the session stays on its own.
pub trait ImageBackend: Sync {
    /// Read dimensions, format and size of the file at `path`.
    fn probe(&self, path: &Path) -> Result<ImageDescriptor, ImageError>;

    /// Resize `input` into `output`; returns the descriptor of the written file.
    fn resize(
        &self,
        input: &Path,
        output: &Path,
        options: &ResizeOptions,
    ) -> Result<ImageDescriptor, ImageError>;

    /// Crop `input` into `output`; returns the descriptor of the written file.
    fn crop(
        &self,
        input: &Path,
        output: &Path,
        options: &CropOptions,
    ) -> Result<ImageDescriptor, ImageError>;

    /// File extensions this engine can read.
    fn supported_formats(&self) -> Vec<String>;
}
