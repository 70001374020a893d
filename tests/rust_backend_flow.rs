//! Session flows that write real files through `RustBackend`.

use image::{ImageFormat, Rgba, RgbaImage};
use imgrs::imaging::{ImageBackend, OutputFormat, RustBackend, Size, fit_image_rect};
use imgrs::session::{Session, SessionSettings};
use imgrs::types::OperationMode;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    img.save_with_format(&path, ImageFormat::Png).unwrap();
    path
}

fn start(backend: &RustBackend, input: &Path) -> Session {
    let mut session = Session::start(backend, SessionSettings::default());
    session.select_image(backend, input).unwrap();
    session
}

#[test]
fn probe_reports_real_dimensions() {
    let tmp = TempDir::new().unwrap();
    let input = write_png(tmp.path(), "source.png", 400, 300);
    let backend = RustBackend::new();

    let session = start(&backend, &input);
    let image = session.image().unwrap();
    assert_eq!(image.dimensions(), (400, 300));
    assert_eq!(image.format, "png");
    assert!(image.file_size_bytes > 0);
    assert_eq!(session.dimensions().width.text(), "400");
}

#[test]
fn resize_writes_derived_height() {
    let tmp = TempDir::new().unwrap();
    let input = write_png(tmp.path(), "source.png", 400, 300);
    let backend = RustBackend::new();

    let mut session = start(&backend, &input);
    session.edit_width("200");
    let written = session.submit(&backend).unwrap().clone();

    assert_eq!(written.path, tmp.path().join("source_resized.png"));
    assert_eq!(written.dimensions(), (200, 150));
    assert_eq!(backend.probe(&written.path).unwrap().dimensions(), (200, 150));
}

#[test]
fn resize_to_jpeg_changes_extension_and_codec() {
    let tmp = TempDir::new().unwrap();
    let input = write_png(tmp.path(), "source.png", 64, 64);
    let backend = RustBackend::new();

    let mut session = start(&backend, &input);
    session.set_resize_format(OutputFormat::Jpeg);
    session.edit_width("32");
    let written = session.submit(&backend).unwrap();

    assert_eq!(written.path, tmp.path().join("source_resized.jpg"));
    assert_eq!(written.format, "jpg");
}

#[test]
fn crop_writes_mapped_region() {
    let tmp = TempDir::new().unwrap();
    let input = write_png(tmp.path(), "source.png", 400, 300);
    let backend = RustBackend::new();

    let mut session = start(&backend, &input);
    session.set_mode(OperationMode::Crop);
    session.set_crop_format(OutputFormat::Webp);
    let displayed = fit_image_rect(Size::new(600.0, 400.0), Size::new(400.0, 300.0)).size();
    session.move_crop_to(displayed, 0.0, 0.0);

    let written = session.submit(&backend).unwrap();
    assert_eq!(written.path, tmp.path().join("source_cropped.webp"));
    assert_eq!(written.width, 150);
    assert!(written.height >= 146 && written.height <= 147);
}

#[test]
fn missing_output_directory_is_a_file_error() {
    let tmp = TempDir::new().unwrap();
    let input = write_png(tmp.path(), "source.png", 40, 30);
    let backend = RustBackend::new();

    let mut session = start(&backend, &input);
    session.set_output_path(tmp.path().join("missing/out.png"));
    assert!(session.submit(&backend).is_err());
    assert!(session.error_message().is_some());
    assert!(!session.is_processing());
}
