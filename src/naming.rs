//! Output filename derivation and input filename checks.
//!
//! Derived outputs sit next to their input:
//!
//! - `/a/b/photo.heic` + webp + crop   → `/a/b/photo_cropped.webp`
//! - `/a/b/photo.heic` + same + resize → `/a/b/photo_resized.heic`
//! - `/a/b/README` + same + resize     → `/a/b/README_resized` (no trailing dot)

use crate::imaging::OutputFormat;
use crate::types::OperationMode;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extensions accepted as image inputs, compared case-insensitively.
const KNOWN_IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "webp", "gif", "bmp", "tiff", "tif", "heic", "heif", "avif",
];

/// Build `<dir>/<stem><suffix>.<ext>` for an operation on `input`.
///
/// `<ext>` comes from `format`'s extension table, or from `input` when the
/// format is [`OutputFormat::SameAsInput`]. With no extension available the
/// name ends at the suffix.
pub fn output_path(input: &Path, format: OutputFormat, mode: OperationMode) -> PathBuf {
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    let mut name: OsString = input.file_stem().map(OsString::from).unwrap_or_default();
    name.push(mode.suffix());

    let ext = match format.file_extension() {
        Some(ext) => Some(OsString::from(ext)),
        None => input.extension().map(OsString::from),
    };
    if let Some(ext) = ext.filter(|e| !e.is_empty()) {
        name.push(".");
        name.push(ext);
    }
    dir.join(name)
}

/// True when `path` has one of the known image extensions.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            KNOWN_IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}
