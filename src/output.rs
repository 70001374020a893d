//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Probe
//!
//! ```text
//! photo.jpg
//!     Size: 4000 × 3000
//!     Format: jpg
//!     File size: 1.5 MB
//! ```
//!
//! ## Resize / Crop
//!
//! ```text
//! Resize → photos/photo_resized.jpg
//!     Size: 1024 × 768
//!     File size: 212.4 KB
//! ```
//!
//! ## Formats
//!
//! ```text
//! Input formats
//!     bmp, gif, jpeg, jpg, png, tif, tiff, webp
//! Output formats
//!     sameAsInput  Same as input
//!     png          PNG
//!     ...
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::imaging::{OutputFormat, ResizeAlgorithm};
use crate::types::{ImageDescriptor, OperationMode};

const UNITS: [&str; 3] = ["KB", "MB", "GB"];

/// Human-readable byte count, 1024-based.
///
/// Plain bytes below 1 KB, otherwise one decimal in the largest unit that
/// keeps the value at or above 1 (capped at GB).
///
/// ```text
/// 512        → 512 B
/// 1536       → 1.5 KB
/// 5_242_880  → 5.0 MB
/// ```
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// `"W × H"` for a descriptor.
pub fn dimensions_string(descriptor: &ImageDescriptor) -> String {
    format!("{} × {}", descriptor.width, descriptor.height)
}

fn file_name(descriptor: &ImageDescriptor) -> String {
    descriptor
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| descriptor.path.display().to_string())
}

// ============================================================================
// Probe
// ============================================================================

pub fn format_descriptor(descriptor: &ImageDescriptor) -> Vec<String> {
    vec![
        file_name(descriptor),
        format!("    Size: {}", dimensions_string(descriptor)),
        format!("    Format: {}", descriptor.format),
        format!("    File size: {}", format_file_size(descriptor.file_size_bytes)),
    ]
}

pub fn print_descriptor(descriptor: &ImageDescriptor) {
    for line in format_descriptor(descriptor) {
        println!("{}", line);
    }
}

// ============================================================================
// Operation outcome
// ============================================================================

/// Lines describing the file an operation wrote.
pub fn format_outcome(mode: OperationMode, written: &ImageDescriptor) -> Vec<String> {
    vec![
        format!("{} → {}", mode.display_name(), written.path.display()),
        format!("    Size: {}", dimensions_string(written)),
        format!("    File size: {}", format_file_size(written.file_size_bytes)),
    ]
}

pub fn print_outcome(mode: OperationMode, written: &ImageDescriptor) {
    for line in format_outcome(mode, written) {
        println!("{}", line);
    }
}

// ============================================================================
// Formats
// ============================================================================

/// Readable inputs, then the output formats and algorithms with their names.
pub fn format_formats(supported: &[String]) -> Vec<String> {
    let mut lines = vec!["Input formats".to_string()];
    if supported.is_empty() {
        lines.push("    (none)".to_string());
    } else {
        lines.push(format!("    {}", supported.join(", ")));
    }

    lines.push("Output formats".to_string());
    for format in OutputFormat::ALL {
        lines.push(format!("    {:<12} {}", format.as_str(), format.display_name()));
    }

    lines.push("Algorithms".to_string());
    for algorithm in ResizeAlgorithm::ALL {
        lines.push(format!(
            "    {:<12} {}",
            algorithm.as_str(),
            algorithm.display_name()
        ));
    }
    lines
}

pub fn print_formats(supported: &[String]) {
    for line in format_formats(supported) {
        println!("{}", line);
    }
}
