//! Tool configuration module.
//!
//! Handles loading, validating, and merging `imgrs.toml`. A config file is
//! sparse: whatever it sets is merged over the stock defaults, everything else
//! keeps its default.
//!
//! ## Config File Location
//!
//! `--config PATH` names the file explicitly. Without it, `imgrs.toml` in the
//! working directory is used when present.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [resize]
//! algorithm = "lanczos3"        # nearest | bilinear | lanczos3
//! format = "sameAsInput"        # sameAsInput | png | jpeg | webp
//! lock_aspect_ratio = true      # height follows width
//!
//! [crop]
//! target_size = [856, 836]      # pixel size whose ratio the frame keeps
//! frame_width = 200.0           # on-screen width of the crop frame
//! format = "sameAsInput"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::dimension::{MAX_DIMENSION, MIN_DIMENSION};
use crate::imaging::{OutputFormat, ResizeAlgorithm};
use crate::session::SessionSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in a directory when no explicit path is given.
pub const CONFIG_FILE_NAME: &str = "imgrs.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `imgrs.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Defaults for resize mode.
    pub resize: ResizeConfig,
    /// Crop frame shape and crop output format.
    pub crop: CropConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [w, h] = self.crop.target_size;
        let range = MIN_DIMENSION..=MAX_DIMENSION;
        if !range.contains(&w) || !range.contains(&h) {
            return Err(ConfigError::Validation(format!(
                "crop.target_size values must be {MIN_DIMENSION}-{MAX_DIMENSION}"
            )));
        }
        if !self.crop.frame_width.is_finite() || self.crop.frame_width <= 0.0 {
            return Err(ConfigError::Validation(
                "crop.frame_width must be a positive number".into(),
            ));
        }
        Ok(())
    }

    /// Defaults a new session starts from.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            algorithm: self.resize.algorithm,
            resize_format: self.resize.format,
            crop_format: self.crop.format,
            lock_aspect_ratio: self.resize.lock_aspect_ratio,
            crop_target: (self.crop.target_size[0], self.crop.target_size[1]),
            crop_frame_width: self.crop.frame_width,
        }
    }
}

/// Resize mode defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub algorithm: ResizeAlgorithm,
    pub format: OutputFormat,
    /// Whether the aspect lock starts switched on.
    pub lock_aspect_ratio: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            algorithm: ResizeAlgorithm::Lanczos3,
            format: OutputFormat::SameAsInput,
            lock_aspect_ratio: true,
        }
    }
}

/// Crop mode defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropConfig {
    /// Pixel size as `[width, height]`; only its ratio shapes the frame.
    pub target_size: [u32; 2],
    /// Display width of the crop frame.
    pub frame_width: f64,
    pub format: OutputFormat,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            target_size: [856, 836],
            frame_width: 200.0,
            format: OutputFormat::SameAsInput,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(AppConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `imgrs.toml` from `dir`, or the stock defaults if there is none.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE_NAME))
}

/// Load the config at `path`, or the stock defaults if it does not exist.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    if overlay.is_some() {
        tracing::debug!(path = %path.display(), "loaded config file");
    }
    resolve_config(stock_defaults_value()?, overlay)
}

/// Returns a fully-commented stock `imgrs.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imgrs Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# imgrs reads ./imgrs.toml, or the file given with --config.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Resize
# ---------------------------------------------------------------------------
[resize]
# Resampling filter: "nearest", "bilinear" or "lanczos3".
algorithm = "lanczos3"

# Output encoding: "sameAsInput", "png", "jpeg" or "webp".
format = "sameAsInput"

# Start with width and height linked by the source aspect ratio.
lock_aspect_ratio = true

# ---------------------------------------------------------------------------
# Crop
# ---------------------------------------------------------------------------
[crop]
# Pixel size [width, height] the crop frame is shaped after. Only the ratio
# matters; each value must be 1-9999.
target_size = [856, 836]

# Width of the crop frame on screen, in display units.
frame_width = 200.0

# Output encoding: "sameAsInput", "png", "jpeg" or "webp".
format = "sameAsInput"
"##
}
