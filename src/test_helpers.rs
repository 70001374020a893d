//! Shared test utilities for the session and request tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut session = session_with_image(4000, 3000);
//! session.edit_width("1024");
//! assert_eq!(session.dimensions().height.text(), "768");
//! ```

use std::path::Path;

use crate::imaging::backend::tests::MockBackend;
use crate::session::{Session, SessionSettings};
use crate::types::ImageDescriptor;

/// Path every helper session selects.
pub const SOURCE_PATH: &str = "/photos/source.jpg";

// =========================================================================
// Fixtures
// =========================================================================

/// Descriptor for a `width × height` JPEG at [`SOURCE_PATH`].
pub fn descriptor(width: u32, height: u32) -> ImageDescriptor {
    ImageDescriptor {
        width,
        height,
        format: "jpg".to_string(),
        file_size_bytes: 2_048,
        path: SOURCE_PATH.into(),
    }
}

/// A default-settings session with a `width × height` image selected.
pub fn session_with_image(width: u32, height: u32) -> Session {
    let backend = MockBackend::with_probes(vec![descriptor(width, height)]);
    let mut session = Session::start(&backend, SessionSettings::default());
    session.select_image(&backend, Path::new(SOURCE_PATH)).unwrap();
    session
}
