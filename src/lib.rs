//! # imgrs
//!
//! Turns loose form state into validated requests for an image engine.
//!
//! A user picks an image, chooses to resize or crop it, types dimensions or
//! drags a crop frame over an on-screen preview, and submits. This crate owns
//! everything between the form and the engine: free-text dimension fields,
//! aspect-locked width/height, a crop frame in display coordinates, and the
//! mapping of that frame back onto source pixels. The engine itself is a
//! trait; [`imaging::RustBackend`] is the bundled implementation.
//!
//! # Flow
//!
//! ```text
//! select_image   probe → descriptor, fields = source size, output path derived
//! edit_*         sanitize → link width/height through the source ratio
//! move_crop_to   clamp frame inside the displayed image
//! submit         validate → ResizeOptions | CropOptions → engine → result
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Form state for one image; edits, crop frame, guarded dispatch |
//! | [`request`] | Validation gate: session → engine options or an error |
//! | [`linker`] | Aspect-locked width/height fields |
//! | [`dimension`] | Sanitizing, parsing and range-checking dimension text |
//! | [`imaging`] | Engine trait, `image`-crate engine, derivation and crop geometry |
//! | [`naming`] | Output path derivation, image file detection |
//! | [`access`] | Scoped acquire/release of user-chosen files |
//! | [`config`] | `imgrs.toml` loading, validation and merging |
//! | [`types`] | `ImageDescriptor` and `OperationMode` |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Width Is Canonical
//!
//! With the aspect lock on, the edited field drives the other one, and only
//! once per edit. Switching the lock on recomputes height from width. Width is
//! never recomputed from a derived height, so toggling the lock cannot make the
//! numbers drift.
//!
//! ## Crop in Display Space
//!
//! The crop frame has a fixed on-screen size and lives in the coordinates of
//! the preview. It is converted to source pixels only at submit time, using
//! the same letterbox scale the preview used, and the result is clamped to lie
//! inside the image. See [`imaging::map_display_crop`].
//!
//! ## One Operation at a Time
//!
//! A submit claims a processing flag that stays held until the engine call is
//! recorded or abandoned. The flag lives in a guard, so no exit path can leave
//! it set.

pub mod access;
pub mod config;
pub mod dimension;
pub mod imaging;
pub mod linker;
pub mod naming;
pub mod output;
pub mod request;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
