//! Aspect-locked width/height fields.
//!
//! Each handler takes the current fields and returns the next ones. The field
//! being edited is the source; the other field is recomputed from it exactly
//! once and nothing reads its own output back, so no edit can cascade.
//! Width is authoritative when the lock is switched on.

use crate::dimension::DimensionInput;
use crate::imaging::{derive_height, derive_width};

/// The pair of dimension fields plus the lock flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedDimensions {
    pub width: DimensionInput,
    pub height: DimensionInput,
    pub locked: bool,
}

impl Default for LinkedDimensions {
    fn default() -> Self {
        Self {
            width: DimensionInput::default(),
            height: DimensionInput::default(),
            locked: true,
        }
    }
}

impl LinkedDimensions {
    /// Fields showing `source` as-is, with the given lock state.
    pub fn from_source(source: (u32, u32), locked: bool) -> Self {
        Self {
            width: DimensionInput::from_value(source.0),
            height: DimensionInput::from_value(source.1),
            locked,
        }
    }

    /// The user typed `raw` into the width field.
    ///
    /// While locked and with a known source size, height follows. A width that
    /// does not parse leaves height alone.
    pub fn on_width_changed(&self, raw: &str, source: Option<(u32, u32)>) -> Self {
        let width = DimensionInput::from_raw(raw);
        let height = match (self.locked, source) {
            (true, Some((sw, sh))) => derive_height(sw, sh, width.value())
                .map(DimensionInput::from_value)
                .unwrap_or_else(|| self.height.clone()),
            _ => self.height.clone(),
        };
        Self {
            width,
            height,
            locked: self.locked,
        }
    }

    /// The user typed `raw` into the height field. Mirror of
    /// [`on_width_changed`](Self::on_width_changed).
    pub fn on_height_changed(&self, raw: &str, source: Option<(u32, u32)>) -> Self {
        let height = DimensionInput::from_raw(raw);
        let width = match (self.locked, source) {
            (true, Some((sw, sh))) => derive_width(sw, sh, height.value())
                .map(DimensionInput::from_value)
                .unwrap_or_else(|| self.width.clone()),
            _ => self.width.clone(),
        };
        Self {
            width,
            height,
            locked: self.locked,
        }
    }

    /// Flip the lock. Turning it on refreshes height from the current width.
    pub fn on_lock_toggled(&self, source: Option<(u32, u32)>) -> Self {
        let locked = !self.locked;
        let height = match (locked, source) {
            (true, Some((sw, sh))) => derive_height(sw, sh, self.width.value())
                .map(DimensionInput::from_value)
                .unwrap_or_else(|| self.height.clone()),
            _ => self.height.clone(),
        };
        Self {
            width: self.width.clone(),
            height,
            locked,
        }
    }
}
