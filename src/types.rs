//! Shared types used by the session, the request builder, and the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Immutable metadata snapshot of a probed image.
///
/// Produced by [`ImageBackend::probe`](crate::imaging::ImageBackend::probe) and
/// by every successful resize/crop (describing the written file). A session
/// replaces its descriptor wholesale when a new image is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub width: u32,
    pub height: u32,
    /// Short codec name as reported by the engine (`"png"`, `"jpg"`, ...).
    pub format: String,
    pub file_size_bytes: u64,
    pub path: PathBuf,
}

impl ImageDescriptor {
    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// True when either axis is zero; such an image cannot be cropped.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Which operation the session will dispatch on submit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    #[default]
    Resize,
    Crop,
}

impl OperationMode {
    pub fn display_name(self) -> &'static str {
        match self {
            OperationMode::Resize => "Resize",
            OperationMode::Crop => "Crop",
        }
    }

    /// Filename suffix appended to the input stem for derived output paths.
    pub fn suffix(self) -> &'static str {
        match self {
            OperationMode::Resize => "_resized",
            OperationMode::Crop => "_cropped",
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
