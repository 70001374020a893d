//! Engine backed by the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Probe | `ImageReader::with_guessed_format` + `into_dimensions` (header only) |
//! | Resize | `DynamicImage::resize_exact` with the chosen `FilterType` |
//! | Crop | `DynamicImage::crop_imm` |
//! | Encode | `DynamicImage::save_with_format` (PNG, JPEG, lossless WebP, or the input's codec) |

use super::backend::{ImageBackend, ImageError};
use super::calculations::derive_height;
use super::params::{CropOptions, OutputFormat, ResizeAlgorithm, ResizeOptions};
use crate::types::ImageDescriptor;
use image::error::ImageError as CodecError;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::Path;
use std::sync::LazyLock;

/// Formats whose decoders are compiled in, by primary extension.
const READ_CANDIDATES: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Tiff,
    ImageFormat::WebP,
    ImageFormat::Gif,
    ImageFormat::Bmp,
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<String>> = LazyLock::new(|| {
    READ_CANDIDATES
        .iter()
        .filter(|fmt| fmt.reading_enabled())
        .flat_map(|fmt| fmt.extensions_str().iter().map(|e| e.to_string()))
        .collect()
});

/// Engine using the pure-Rust codecs of the `image` crate.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn filter_for(algorithm: ResizeAlgorithm) -> FilterType {
    match algorithm {
        ResizeAlgorithm::Nearest => FilterType::Nearest,
        ResizeAlgorithm::Bilinear => FilterType::Triangle,
        ResizeAlgorithm::Lanczos3 => FilterType::Lanczos3,
    }
}

fn format_name(format: ImageFormat) -> String {
    format
        .extensions_str()
        .first()
        .map(|e| e.to_string())
        .unwrap_or_else(|| format!("{format:?}").to_lowercase())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_else(|| "unknown".to_string())
}

fn codec_error(path: &Path, err: CodecError) -> ImageError {
    match err {
        CodecError::IoError(e) => ImageError::Io(e),
        CodecError::Unsupported(_) => ImageError::UnsupportedFormat(extension_of(path)),
        other => ImageError::Processing(format!("{}: {}", path.display(), other)),
    }
}

/// Open `path` and sniff its format from the header bytes.
fn open(path: &Path) -> Result<(ImageReader<std::io::BufReader<std::fs::File>>, ImageFormat), ImageError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    match reader.format() {
        Some(format) if format.reading_enabled() => Ok((reader, format)),
        Some(format) => Err(ImageError::UnsupportedFormat(format_name(format))),
        None => Err(ImageError::UnsupportedFormat(extension_of(path))),
    }
}

fn load(path: &Path) -> Result<(DynamicImage, ImageFormat), ImageError> {
    let (reader, format) = open(path)?;
    let img = reader.decode().map_err(|e| codec_error(path, e))?;
    Ok((img, format))
}

/// Pick the encoder: explicit choice, else the output's extension, else the
/// input's own codec.
fn target_format(
    requested: OutputFormat,
    output: &Path,
    input_format: ImageFormat,
) -> Result<ImageFormat, ImageError> {
    let format = match requested {
        OutputFormat::Png => ImageFormat::Png,
        OutputFormat::Jpeg => ImageFormat::Jpeg,
        OutputFormat::Webp => ImageFormat::WebP,
        OutputFormat::SameAsInput => ImageFormat::from_path(output).unwrap_or(input_format),
    };
    if !format.writing_enabled() {
        return Err(ImageError::UnsupportedFormat(format_name(format)));
    }
    Ok(format)
}

fn save(img: DynamicImage, output: &Path, format: ImageFormat) -> Result<(), ImageError> {
    // JPEG has no alpha; the WebP encoder only takes 8-bit RGB(A).
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        ImageFormat::WebP => DynamicImage::ImageRgba8(img.to_rgba8()),
        _ => img,
    };
    img.save_with_format(output, format)
        .map_err(|e| codec_error(output, e))
}

impl ImageBackend for RustBackend {
    fn probe(&self, path: &Path) -> Result<ImageDescriptor, ImageError> {
        let file_size_bytes = std::fs::metadata(path)?.len();
        let (reader, format) = open(path)?;
        let (width, height) = reader.into_dimensions().map_err(|e| codec_error(path, e))?;
        Ok(ImageDescriptor {
            width,
            height,
            format: format_name(format),
            file_size_bytes,
            path: path.to_path_buf(),
        })
    }

    fn resize(
        &self,
        input: &Path,
        output: &Path,
        options: &ResizeOptions,
    ) -> Result<ImageDescriptor, ImageError> {
        let (img, input_format) = load(input)?;
        let height = match options.height {
            Some(h) => h,
            None => derive_height(img.width(), img.height(), Some(options.width)).ok_or_else(
                || ImageError::InvalidDimensions(format!("{} has zero width", input.display())),
            )?,
        };
        tracing::debug!(
            input = %input.display(),
            width = options.width,
            height,
            algorithm = %options.algorithm,
            "resizing"
        );

        let format = target_format(options.output_format, output, input_format)?;
        let resized = img.resize_exact(options.width, height, filter_for(options.algorithm));
        save(resized, output, format)?;
        self.probe(output)
    }

    fn crop(
        &self,
        input: &Path,
        output: &Path,
        options: &CropOptions,
    ) -> Result<ImageDescriptor, ImageError> {
        let (img, input_format) = load(input)?;
        let fits_x = options.x as u64 + options.width as u64 <= img.width() as u64;
        let fits_y = options.y as u64 + options.height as u64 <= img.height() as u64;
        if options.width == 0 || options.height == 0 || !fits_x || !fits_y {
            return Err(ImageError::InvalidDimensions(format!(
                "crop {}x{}+{}+{} does not fit {}x{}",
                options.width,
                options.height,
                options.x,
                options.y,
                img.width(),
                img.height()
            )));
        }
        tracing::debug!(
            input = %input.display(),
            x = options.x,
            y = options.y,
            width = options.width,
            height = options.height,
            "cropping"
        );

        let format = target_format(options.output_format, output, input_format)?;
        let cropped = img.crop_imm(options.x, options.y, options.width, options.height);
        save(cropped, output, format)?;
        self.probe(output)
    }

    fn supported_formats(&self) -> Vec<String> {
        SUPPORTED_EXTENSIONS.clone()
    }
}
