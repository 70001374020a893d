//! Parameter types for engine operations.
//!
//! These structs describe *what* the engine should do, never *how*. They are
//! produced by the [`request`](crate::request) builder for a single engine call
//! and then discarded.
//!
//! ## Types
//!
//! - [`ResizeAlgorithm`]: resampling filter choice.
//! - [`OutputFormat`]: encoder choice, including "keep the input's format".
//! - [`ResizeOptions`]: target width, optional height, algorithm, format.
//! - [`CropOptions`]: pixel rectangle inside the source, plus format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseChoiceError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// Resampling filter used by a resize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeAlgorithm {
    Nearest,
    Bilinear,
    #[default]
    Lanczos3,
}

impl ResizeAlgorithm {
    pub const ALL: [ResizeAlgorithm; 3] = [
        ResizeAlgorithm::Nearest,
        ResizeAlgorithm::Bilinear,
        ResizeAlgorithm::Lanczos3,
    ];

    /// Identifier used in config files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            ResizeAlgorithm::Nearest => "nearest",
            ResizeAlgorithm::Bilinear => "bilinear",
            ResizeAlgorithm::Lanczos3 => "lanczos3",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ResizeAlgorithm::Nearest => "Nearest (Fastest)",
            ResizeAlgorithm::Bilinear => "Bilinear (Balanced)",
            ResizeAlgorithm::Lanczos3 => "Lanczos3 (Highest Quality)",
        }
    }
}

impl fmt::Display for ResizeAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeAlgorithm {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseChoiceError {
                kind: "algorithm",
                value: s.to_string(),
                expected: "nearest, bilinear, lanczos3",
            })
    }
}

/// Output encoding for the written file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    /// Keep the source file's codec and extension.
    #[default]
    SameAsInput,
    Png,
    Jpeg,
    Webp,
}

/// `(format, identifier, display name, file extension)`.
///
/// The single source of truth for how a format is named and which extension
/// it writes. `jpeg` writes `.jpg`.
const FORMAT_TABLE: [(OutputFormat, &str, &str, Option<&str>); 4] = [
    (OutputFormat::SameAsInput, "sameAsInput", "Same as input", None),
    (OutputFormat::Png, "png", "PNG", Some("png")),
    (OutputFormat::Jpeg, "jpeg", "JPEG", Some("jpg")),
    (OutputFormat::Webp, "webp", "WebP", Some("webp")),
];

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::SameAsInput,
        OutputFormat::Png,
        OutputFormat::Jpeg,
        OutputFormat::Webp,
    ];

    fn row(self) -> (OutputFormat, &'static str, &'static str, Option<&'static str>) {
        FORMAT_TABLE
            .into_iter()
            .find(|(f, ..)| *f == self)
            .unwrap_or(FORMAT_TABLE[0])
    }

    pub fn as_str(self) -> &'static str {
        self.row().1
    }

    pub fn display_name(self) -> &'static str {
        self.row().2
    }

    /// Extension written for this format; `None` means "use the input's".
    pub fn file_extension(self) -> Option<&'static str> {
        self.row().3
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the kebab-case spelling too, since it reads better on a CLI.
        let normalized = if s.eq_ignore_ascii_case("same-as-input") {
            "sameAsInput"
        } else {
            s
        };
        FORMAT_TABLE
            .into_iter()
            .find(|(_, id, ..)| id.eq_ignore_ascii_case(normalized))
            .map(|(f, ..)| f)
            .ok_or_else(|| ParseChoiceError {
                kind: "format",
                value: s.to_string(),
                expected: "sameAsInput, png, jpeg, webp",
            })
    }
}

/// Validated resize request.
///
/// `width` is always in `1..=9999`; `height`, when present, too. A `None`
/// height asks the engine to derive it from the source aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResizeOptions {
    pub width: u32,
    pub height: Option<u32>,
    pub algorithm: ResizeAlgorithm,
    pub output_format: OutputFormat,
}

/// Validated crop request in source pixel coordinates.
///
/// Always non-empty and fully inside the source image it was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropOptions {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub output_format: OutputFormat,
}
