//! End-to-end session flows against a scripted engine.
//!
//! The engine here only remembers what it was asked to do, so these tests pin
//! down exactly which requests reach it for a sequence of form edits.

use imgrs::imaging::{
    CropOptions, ImageBackend, ImageError, OutputFormat, ResizeAlgorithm, ResizeOptions, Size,
    fit_image_rect,
};
use imgrs::request::RequestError;
use imgrs::session::{Session, SessionSettings, SubmitError};
use imgrs::types::{ImageDescriptor, OperationMode};
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Resize(ResizeOptions),
    Crop(CropOptions),
}

/// Reports a fixed source size and records every engine call.
struct ScriptedEngine {
    source: (u32, u32),
    calls: Mutex<Vec<Call>>,
}

impl ScriptedEngine {
    fn new(width: u32, height: u32) -> Self {
        Self {
            source: (width, height),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn written(path: &Path, width: u32, height: u32) -> ImageDescriptor {
        ImageDescriptor {
            width,
            height,
            format: "png".into(),
            file_size_bytes: 1,
            path: path.to_path_buf(),
        }
    }
}

impl ImageBackend for ScriptedEngine {
    fn probe(&self, path: &Path) -> Result<ImageDescriptor, ImageError> {
        if path.extension().is_some_and(|e| e == "txt") {
            return Err(ImageError::UnsupportedFormat("txt".into()));
        }
        Ok(Self::written(path, self.source.0, self.source.1))
    }

    fn resize(
        &self,
        _input: &Path,
        output: &Path,
        options: &ResizeOptions,
    ) -> Result<ImageDescriptor, ImageError> {
        self.calls.lock().unwrap().push(Call::Resize(*options));
        let height = options.height.unwrap_or(options.width);
        Ok(Self::written(output, options.width, height))
    }

    fn crop(
        &self,
        _input: &Path,
        output: &Path,
        options: &CropOptions,
    ) -> Result<ImageDescriptor, ImageError> {
        self.calls.lock().unwrap().push(Call::Crop(*options));
        Ok(Self::written(output, options.width, options.height))
    }

    fn supported_formats(&self) -> Vec<String> {
        vec!["png".into()]
    }
}

fn open(engine: &ScriptedEngine, path: &str) -> Session {
    let mut session = Session::start(engine, SessionSettings::default());
    session.select_image(engine, Path::new(path)).unwrap();
    session
}

// =========================================================================
// Resize
// =========================================================================

#[test]
fn locked_resize_sends_width_only() {
    let engine = ScriptedEngine::new(4000, 3000);
    let mut session = open(&engine, "/p/photo.jpg");

    assert_eq!(session.edit_width("1024").height.text(), "768");
    let written = session.submit(&engine).unwrap();
    assert_eq!(written.path, Path::new("/p/photo_resized.jpg"));

    assert_eq!(
        engine.calls(),
        vec![Call::Resize(ResizeOptions {
            width: 1024,
            height: None,
            algorithm: ResizeAlgorithm::Lanczos3,
            output_format: OutputFormat::SameAsInput,
        })]
    );
}

#[test]
fn unlocked_resize_sends_both_sides() {
    let engine = ScriptedEngine::new(4000, 3000);
    let mut session = open(&engine, "/p/photo.jpg");
    session.edit_width("1024");
    session.toggle_lock();
    session.edit_height("500");
    session.set_resize_format(OutputFormat::Png);

    session.submit(&engine).unwrap();
    assert_eq!(
        engine.calls(),
        vec![Call::Resize(ResizeOptions {
            width: 1024,
            height: Some(500),
            algorithm: ResizeAlgorithm::Lanczos3,
            output_format: OutputFormat::Png,
        })]
    );
    assert_eq!(session.output_path(), Some(Path::new("/p/photo_resized.png")));
}

#[test]
fn out_of_range_width_never_reaches_engine() {
    let engine = ScriptedEngine::new(4000, 3000);
    let mut session = open(&engine, "/p/photo.jpg");
    session.edit_width("12000");

    assert!(!session.can_process());
    let err = session.submit(&engine).unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Request(RequestError::InvalidDimensions(_))
    ));
    assert!(engine.calls().is_empty());
    assert!(session.error_message().unwrap().contains("at most 9999"));
}

// =========================================================================
// Crop
// =========================================================================

#[test]
fn crop_maps_preview_frame_to_pixels() {
    let engine = ScriptedEngine::new(856, 836);
    let mut session = open(&engine, "/p/photo.heic");
    session.set_mode(OperationMode::Crop);
    session.set_crop_format(OutputFormat::Webp);

    session.move_crop_to(Size::new(428.0, 418.0), 100.0, 100.0);
    let written = session.submit(&engine).unwrap();
    assert_eq!(written.path, Path::new("/p/photo_cropped.webp"));

    assert_eq!(
        engine.calls(),
        vec![Call::Crop(CropOptions {
            x: 200,
            y: 200,
            width: 400,
            height: 391,
            output_format: OutputFormat::Webp,
        })]
    );
}

#[test]
fn crop_frame_dragged_past_edge_stays_inside_source() {
    let engine = ScriptedEngine::new(3000, 2000);
    let mut session = open(&engine, "/p/wide.png");
    session.set_mode(OperationMode::Crop);

    let displayed = fit_image_rect(
        Size::new(600.0, 400.0),
        Size::new(3000.0, 2000.0),
    )
    .size();
    let start = session.move_crop_to(displayed, 10.0, 10.0);
    session.drag_crop_by(displayed, start, 5000.0, 5000.0);
    session.submit(&engine).unwrap();

    let Call::Crop(options) = engine.calls()[0].clone() else {
        panic!("expected a crop");
    };
    assert!(options.x + options.width <= 3000);
    assert!(options.y + options.height <= 2000);
    assert!(options.width >= 1 && options.height >= 1);
}

#[test]
fn crop_before_preview_is_rejected() {
    let engine = ScriptedEngine::new(856, 836);
    let mut session = open(&engine, "/p/photo.png");
    session.set_mode(OperationMode::Crop);

    let err = session.submit(&engine).unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Request(RequestError::PreviewNotReady)
    ));
    assert!(engine.calls().is_empty());
}

// =========================================================================
// Selection and dispatch
// =========================================================================

#[test]
fn unreadable_selection_reports_error() {
    let engine = ScriptedEngine::new(10, 10);
    let mut session = Session::start(&engine, SessionSettings::default());
    assert!(session.select_image(&engine, Path::new("/p/notes.txt")).is_err());
    assert_eq!(session.error_message(), Some("Unsupported format: txt"));

    // A good selection afterwards clears the message
    session.select_image(&engine, Path::new("/p/ok.png")).unwrap();
    assert_eq!(session.error_message(), None);
}

#[test]
fn only_one_operation_in_flight() {
    let engine = ScriptedEngine::new(4000, 3000);
    let mut session = open(&engine, "/p/photo.jpg");

    let pending = session.begin_submit().unwrap();
    assert!(matches!(session.begin_submit(), Err(SubmitError::Busy)));
    assert!(matches!(session.submit(&engine), Err(SubmitError::Busy)));

    let completed = std::thread::scope(|s| s.spawn(|| pending.run(&engine)).join().unwrap());
    session.finish(completed).unwrap();
    assert!(!session.is_processing());
    assert_eq!(engine.calls().len(), 1);

    session.submit(&engine).unwrap();
    assert_eq!(engine.calls().len(), 2);
}

#[test]
fn settings_seed_every_selection() {
    let engine = ScriptedEngine::new(4000, 3000);
    let settings = SessionSettings {
        algorithm: ResizeAlgorithm::Nearest,
        resize_format: OutputFormat::Jpeg,
        lock_aspect_ratio: false,
        ..SessionSettings::default()
    };
    let mut session = Session::start(&engine, settings);
    session.select_image(&engine, Path::new("/p/a.png")).unwrap();
    assert!(!session.dimensions().locked);
    assert_eq!(session.output_path(), Some(Path::new("/p/a_resized.jpg")));

    session.set_algorithm(ResizeAlgorithm::Bilinear);
    session.select_image(&engine, Path::new("/p/b.png")).unwrap();
    assert_eq!(session.algorithm(), ResizeAlgorithm::Nearest);
}
