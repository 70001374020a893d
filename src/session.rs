//! Per-image editing session.
//!
//! A [`Session`] holds everything the form shows for one selected image: the
//! probed descriptor, the two dimension fields and their lock, the crop frame
//! in display space, the chosen mode, algorithm and formats, and the output
//! path. It is owned by a single controlling layer and mutated only through
//! the methods here, each of which runs to completion.
//!
//! # Dispatch
//!
//! Submitting goes through three steps so the engine call can run elsewhere:
//!
//! ```text
//! begin_submit()  Idle → Validating → Dispatched    (returns PendingOperation)
//! pending.run()   engine call under scoped file access
//! finish()        Dispatched → Succeeded | Failed → Idle
//! ```
//!
//! The processing flag is claimed in `begin_submit` and held by a guard inside
//! the pending operation, so it is released however that operation ends:
//! finished, failed, dropped, or unwound by a panic. A second `begin_submit`
//! while the flag is held fails with [`SubmitError::Busy`].
//!
//! Each selection gets a new number that travels with the pending operation.
//! An operation that completes after another image was selected is dropped
//! by `finish` with [`SubmitError::Superseded`]; it never becomes the new
//! image's result.

use crate::access::{ResourceAccess, ScopedAccess, Unsandboxed};
use crate::imaging::{
    CropOptions, DisplayCropRect, ImageBackend, ImageError, OutputFormat, Rect, ResizeAlgorithm,
    ResizeOptions, Size, clamp_display_crop, crop_frame_size,
};
use crate::linker::LinkedDimensions;
use crate::naming;
use crate::request::{self, RequestError};
use crate::types::{ImageDescriptor, OperationMode};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("An operation is already in progress")]
    Busy,
    #[error("The image changed before the operation finished")]
    Superseded,
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Engine(#[from] ImageError),
}

/// Where the session is in the submit cycle.
///
/// `Idle` until the first submit after a selection. `Dispatched` while an
/// operation holds the processing flag. Afterwards the outcome of the last
/// submit (`Succeeded` or `Failed`) until the next submit or selection.
/// `Validating` only ever appears in log events; validation runs to
/// completion inside `begin_submit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Dispatched,
    Succeeded,
    Failed,
}

/// Defaults applied to every new selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub algorithm: ResizeAlgorithm,
    pub resize_format: OutputFormat,
    pub crop_format: OutputFormat,
    pub lock_aspect_ratio: bool,
    /// Pixel size whose ratio the crop frame keeps.
    pub crop_target: (u32, u32),
    /// Display width of the crop frame.
    pub crop_frame_width: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            algorithm: ResizeAlgorithm::default(),
            resize_format: OutputFormat::default(),
            crop_format: OutputFormat::default(),
            lock_aspect_ratio: true,
            crop_target: (856, 836),
            crop_frame_width: 200.0,
        }
    }
}

/// The engine call a pending operation will make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineRequest {
    Resize(ResizeOptions),
    Crop(CropOptions),
}

impl EngineRequest {
    pub fn mode(&self) -> OperationMode {
        match self {
            EngineRequest::Resize(_) => OperationMode::Resize,
            EngineRequest::Crop(_) => OperationMode::Crop,
        }
    }
}

/// Holds the session's processing flag; clears it on drop.
struct ProcessingGuard(Arc<AtomicBool>);

impl ProcessingGuard {
    fn claim(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A validated request that owns the right to call the engine.
pub struct PendingOperation {
    selection: u64,
    input: PathBuf,
    output: PathBuf,
    request: EngineRequest,
    access: Arc<dyn ResourceAccess>,
    guard: ProcessingGuard,
}

impl PendingOperation {
    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn request(&self) -> &EngineRequest {
        &self.request
    }

    /// Make the engine call with both files held under scoped access.
    pub fn run<B: ImageBackend + ?Sized>(self, backend: &B) -> CompletedOperation {
        let outcome = {
            let _input = ScopedAccess::acquire(self.access.as_ref(), &self.input);
            let _output = ScopedAccess::acquire(self.access.as_ref(), &self.output);
            match &self.request {
                EngineRequest::Resize(options) => backend.resize(&self.input, &self.output, options),
                EngineRequest::Crop(options) => backend.crop(&self.input, &self.output, options),
            }
        };
        CompletedOperation {
            selection: self.selection,
            mode: self.request.mode(),
            outcome,
            _guard: self.guard,
        }
    }
}

/// An engine call that has returned but not yet been recorded.
pub struct CompletedOperation {
    selection: u64,
    mode: OperationMode,
    outcome: Result<ImageDescriptor, ImageError>,
    _guard: ProcessingGuard,
}

impl CompletedOperation {
    pub fn outcome(&self) -> Result<&ImageDescriptor, &ImageError> {
        self.outcome.as_ref()
    }
}

/// Form state for one selected image.
pub struct Session {
    settings: SessionSettings,
    supported_formats: Vec<String>,
    access: Arc<dyn ResourceAccess>,
    input: Option<PathBuf>,
    image: Option<ImageDescriptor>,
    output: Option<PathBuf>,
    output_chosen: bool,
    dimensions: LinkedDimensions,
    mode: OperationMode,
    algorithm: ResizeAlgorithm,
    resize_format: OutputFormat,
    crop_format: OutputFormat,
    crop_rect: DisplayCropRect,
    displayed_image_size: Size,
    processing: Arc<AtomicBool>,
    phase: Phase,
    /// Bumped on every selection; stamps pending operations.
    selection: u64,
    result: Option<ImageDescriptor>,
    error_message: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionSettings::default(), Vec::new())
    }
}

impl Session {
    pub fn new(settings: SessionSettings, supported_formats: Vec<String>) -> Self {
        Self {
            dimensions: LinkedDimensions {
                locked: settings.lock_aspect_ratio,
                ..LinkedDimensions::default()
            },
            mode: OperationMode::default(),
            algorithm: settings.algorithm,
            resize_format: settings.resize_format,
            crop_format: settings.crop_format,
            settings,
            supported_formats,
            access: Arc::new(Unsandboxed),
            input: None,
            image: None,
            output: None,
            output_chosen: false,
            crop_rect: Rect::default(),
            displayed_image_size: Size::ZERO,
            processing: Arc::new(AtomicBool::new(false)),
            phase: Phase::Idle,
            selection: 0,
            result: None,
            error_message: None,
        }
    }

    /// New session whose supported formats are queried from `backend` once.
    pub fn start<B: ImageBackend + ?Sized>(backend: &B, settings: SessionSettings) -> Self {
        Self::new(settings, backend.supported_formats())
    }

    /// Route probe and engine file access through `access`.
    pub fn with_access(mut self, access: Arc<dyn ResourceAccess>) -> Self {
        self.access = access;
        self
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn supported_formats(&self) -> &[String] {
        &self.supported_formats
    }

    pub fn input_path(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn image(&self) -> Option<&ImageDescriptor> {
        self.image.as_ref()
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn dimensions(&self) -> &LinkedDimensions {
        &self.dimensions
    }

    pub fn mode(&self) -> OperationMode {
        self.mode
    }

    pub fn algorithm(&self) -> ResizeAlgorithm {
        self.algorithm
    }

    pub fn resize_format(&self) -> OutputFormat {
        self.resize_format
    }

    pub fn crop_format(&self) -> OutputFormat {
        self.crop_format
    }

    /// Format used by the current mode.
    pub fn output_format(&self) -> OutputFormat {
        match self.mode {
            OperationMode::Resize => self.resize_format,
            OperationMode::Crop => self.crop_format,
        }
    }

    pub fn crop_rect(&self) -> DisplayCropRect {
        self.crop_rect
    }

    pub fn displayed_image_size(&self) -> Size {
        self.displayed_image_size
    }

    /// Display size of the crop frame.
    pub fn crop_frame(&self) -> Size {
        crop_frame_size(self.settings.crop_frame_width, self.settings.crop_target)
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    pub fn phase(&self) -> Phase {
        if self.is_processing() {
            Phase::Dispatched
        } else {
            self.phase
        }
    }

    /// Descriptor of the last written file.
    pub fn result(&self) -> Option<&ImageDescriptor> {
        self.result.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Whether a submit right now would pass validation.
    pub fn can_process(&self) -> bool {
        if self.is_processing() {
            return false;
        }
        match self.mode {
            OperationMode::Resize => request::build_resize(self).is_ok(),
            OperationMode::Crop => request::build_crop(self).is_ok(),
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Start over with the image at `path`.
    ///
    /// Every field goes back to its default, the output path is derived next
    /// to the input, and the file is probed. Paths without a known image
    /// extension are rejected before the engine sees them. On success the
    /// dimension fields show the image's size.
    pub fn select_image<B: ImageBackend + ?Sized>(
        &mut self,
        backend: &B,
        path: &Path,
    ) -> Result<&ImageDescriptor, ImageError> {
        self.reset_for(path);

        let probed = if naming::is_image_file(path) {
            let _access = ScopedAccess::acquire(self.access.as_ref(), path);
            backend.probe(path)
        } else {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_else(|| "unknown".to_string());
            Err(ImageError::UnsupportedFormat(ext))
        };
        match probed {
            Ok(descriptor) => {
                tracing::info!(
                    path = %path.display(),
                    width = descriptor.width,
                    height = descriptor.height,
                    format = %descriptor.format,
                    "image selected"
                );
                self.dimensions = LinkedDimensions::from_source(
                    descriptor.dimensions(),
                    self.settings.lock_aspect_ratio,
                );
                Ok(&*self.image.insert(descriptor))
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "probe failed");
                self.error_message = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn reset_for(&mut self, path: &Path) {
        let settings = self.settings.clone();
        self.dimensions = LinkedDimensions {
            locked: settings.lock_aspect_ratio,
            ..LinkedDimensions::default()
        };
        self.mode = OperationMode::default();
        self.algorithm = settings.algorithm;
        self.resize_format = settings.resize_format;
        self.crop_format = settings.crop_format;
        self.crop_rect = Rect::default();
        self.displayed_image_size = Size::ZERO;
        self.result = None;
        self.error_message = None;
        self.phase = Phase::Idle;
        self.selection = self.selection.wrapping_add(1);
        self.image = None;
        self.input = Some(path.to_path_buf());
        self.output_chosen = false;
        self.rederive_output();
    }

    fn rederive_output(&mut self) {
        if self.output_chosen {
            return;
        }
        self.output = self
            .input
            .as_deref()
            .map(|input| naming::output_path(input, self.output_format(), self.mode));
    }

    // ------------------------------------------------------------------
    // Form edits
    // ------------------------------------------------------------------

    fn source_size(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(ImageDescriptor::dimensions)
    }

    pub fn edit_width(&mut self, raw: &str) -> &LinkedDimensions {
        self.dimensions = self.dimensions.on_width_changed(raw, self.source_size());
        tracing::debug!(
            width = self.dimensions.width.text(),
            height = self.dimensions.height.text(),
            locked = self.dimensions.locked,
            "width edited"
        );
        &self.dimensions
    }

    pub fn edit_height(&mut self, raw: &str) -> &LinkedDimensions {
        self.dimensions = self.dimensions.on_height_changed(raw, self.source_size());
        tracing::debug!(
            width = self.dimensions.width.text(),
            height = self.dimensions.height.text(),
            locked = self.dimensions.locked,
            "height edited"
        );
        &self.dimensions
    }

    pub fn toggle_lock(&mut self) -> &LinkedDimensions {
        self.dimensions = self.dimensions.on_lock_toggled(self.source_size());
        tracing::debug!(locked = self.dimensions.locked, "aspect lock toggled");
        &self.dimensions
    }

    pub fn set_mode(&mut self, mode: OperationMode) {
        self.mode = mode;
        self.rederive_output();
    }

    pub fn set_algorithm(&mut self, algorithm: ResizeAlgorithm) {
        self.algorithm = algorithm;
    }

    pub fn set_resize_format(&mut self, format: OutputFormat) {
        self.resize_format = format;
        self.rederive_output();
    }

    pub fn set_crop_format(&mut self, format: OutputFormat) {
        self.crop_format = format;
        self.rederive_output();
    }

    /// Use `path` as the output until the next image selection.
    pub fn set_output_path(&mut self, path: impl Into<PathBuf>) {
        self.output = Some(path.into());
        self.output_chosen = true;
    }

    pub fn clear_output_path(&mut self) {
        self.output = None;
        self.output_chosen = true;
    }

    // ------------------------------------------------------------------
    // Crop preview
    // ------------------------------------------------------------------

    /// The preview was laid out with the image drawn at `displayed`.
    ///
    /// Sizes the frame and pulls it back inside the image.
    pub fn show_crop_preview(&mut self, displayed: Size) -> DisplayCropRect {
        let origin = self.crop_rect;
        self.move_crop_to(displayed, origin.x, origin.y)
    }

    /// Place the frame's top-left corner at `(x, y)` relative to the image.
    pub fn move_crop_to(&mut self, displayed: Size, x: f64, y: f64) -> DisplayCropRect {
        let frame = self.crop_frame();
        self.displayed_image_size = displayed;
        self.crop_rect = clamp_display_crop(Rect::new(x, y, frame.width, frame.height), displayed, frame);
        tracing::debug!(
            x = self.crop_rect.x,
            y = self.crop_rect.y,
            displayed_width = displayed.width,
            displayed_height = displayed.height,
            "crop frame moved"
        );
        self.crop_rect
    }

    /// Drag the frame by `(dx, dy)` from where it was when the drag began.
    pub fn drag_crop_by(
        &mut self,
        displayed: Size,
        drag_start: DisplayCropRect,
        dx: f64,
        dy: f64,
    ) -> DisplayCropRect {
        self.move_crop_to(displayed, drag_start.x + dx, drag_start.y + dy)
    }

    // ------------------------------------------------------------------
    // Submit
    // ------------------------------------------------------------------

    /// Validate the current mode's request and claim the processing flag.
    pub fn begin_submit(&mut self) -> Result<PendingOperation, SubmitError> {
        let Some(guard) = ProcessingGuard::claim(&self.processing) else {
            tracing::warn!(mode = %self.mode, "submit rejected: operation in flight");
            return Err(SubmitError::Busy);
        };
        tracing::debug!(mode = %self.mode, phase = ?Phase::Validating, "submit");
        self.error_message = None;
        self.result = None;
        self.phase = Phase::Idle;

        let built = match self.mode {
            OperationMode::Resize => request::build_resize(self).map(EngineRequest::Resize),
            OperationMode::Crop => request::build_crop(self).map(EngineRequest::Crop),
        };
        let request = match built {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(mode = %self.mode, error = %err, "request rejected");
                self.phase = Phase::Failed;
                self.error_message = Some(err.to_string());
                return Err(err.into());
            }
        };

        // Validation passed, so both paths are present.
        let (Some(input), Some(output)) = (self.input.clone(), self.output.clone()) else {
            return Err(RequestError::NoImage.into());
        };
        tracing::debug!(
            mode = %self.mode,
            phase = ?Phase::Dispatched,
            output = %output.display(),
            ?request,
            "dispatching"
        );
        Ok(PendingOperation {
            selection: self.selection,
            input,
            output,
            request,
            access: Arc::clone(&self.access),
            guard,
        })
    }

    /// Record a completed engine call and release the processing flag.
    ///
    /// An operation started before the current selection is discarded.
    pub fn finish(&mut self, completed: CompletedOperation) -> Result<&ImageDescriptor, SubmitError> {
        let CompletedOperation {
            selection,
            mode,
            outcome,
            _guard,
        } = completed;
        if selection != self.selection {
            tracing::warn!(
                %mode,
                succeeded = outcome.is_ok(),
                "discarding operation started for a previous selection"
            );
            return Err(SubmitError::Superseded);
        }
        match outcome {
            Ok(descriptor) => {
                tracing::info!(
                    %mode,
                    phase = ?Phase::Succeeded,
                    width = descriptor.width,
                    height = descriptor.height,
                    path = %descriptor.path.display(),
                    "operation finished"
                );
                self.phase = Phase::Succeeded;
                Ok(&*self.result.insert(descriptor))
            }
            Err(err) => {
                tracing::warn!(%mode, phase = ?Phase::Failed, error = %err, "operation failed");
                self.phase = Phase::Failed;
                self.error_message = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Validate, call the engine, and record the outcome.
    pub fn submit<B: ImageBackend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> Result<&ImageDescriptor, SubmitError> {
        let pending = self.begin_submit()?;
        let completed = pending.run(backend);
        self.finish(completed)
    }
}
