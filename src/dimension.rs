//! Free-text dimension fields.
//!
//! A dimension field holds whatever the user typed, reduced to its digits.
//! Parsing and range checking are separate steps: a field can parse to a
//! number that is still unacceptable (`0`, `10000`), and the request builder
//! re-checks the range on every submit.

use std::fmt;
use thiserror::Error;

/// Smallest accepted target dimension, in pixels.
pub const MIN_DIMENSION: u32 = 1;
/// Largest accepted target dimension, in pixels.
pub const MAX_DIMENSION: u32 = 9999;

/// Strip every character that is not an ASCII decimal digit.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Parse trimmed text as an unsigned base-10 integer.
///
/// Returns `None` for empty text, anything other than ASCII digits (signs
/// included), and values that overflow `u32`.
pub fn parse(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// The axis a dimension belongs to, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Width => f.write_str("width"),
            Axis::Height => f.write_str("height"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DimensionError {
    #[error("{axis} is empty or not a number")]
    Missing { axis: Axis },
    #[error("{axis} must be at least {}, got {value}", MIN_DIMENSION)]
    BelowMinimum { axis: Axis, value: u32 },
    #[error("{axis} must be at most {}, got {value}", MAX_DIMENSION)]
    AboveMaximum { axis: Axis, value: u32 },
    /// All digits, but too long to read as a number.
    #[error("{axis} must be at most {}, got {digits}", MAX_DIMENSION)]
    Overflow { axis: Axis, digits: String },
}

/// Check a parsed value against `MIN_DIMENSION..=MAX_DIMENSION`.
pub fn validate(axis: Axis, value: Option<u32>) -> Result<u32, DimensionError> {
    match value {
        None => Err(DimensionError::Missing { axis }),
        Some(v) if v < MIN_DIMENSION => Err(DimensionError::BelowMinimum { axis, value: v }),
        Some(v) if v > MAX_DIMENSION => Err(DimensionError::AboveMaximum { axis, value: v }),
        Some(v) => Ok(v),
    }
}

/// A dimension text field: sanitized text plus its numeric reading.
///
/// Only sanitized text is ever stored, and the value is always read back from
/// that text, so the two cannot disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionInput {
    text: String,
}

impl DimensionInput {
    /// Build a field from raw user input.
    pub fn from_raw(raw: &str) -> Self {
        Self {
            text: sanitize(raw),
        }
    }

    /// Build a field showing a computed value.
    pub fn from_value(value: u32) -> Self {
        Self {
            text: value.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> Option<u32> {
        parse(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Range-check the field for `axis`.
    ///
    /// Digits too long for `u32` report the upper bound, not a missing value.
    pub fn check(&self, axis: Axis) -> Result<u32, DimensionError> {
        match self.value() {
            None if !self.text.is_empty() => Err(DimensionError::Overflow {
                axis,
                digits: self.text.clone(),
            }),
            value => validate(axis, value),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_sanitize_is_idempotent(s in ".*") {
            let once = sanitize(&s);
            prop_assert_eq!(sanitize(&once), once);
        }

        #[test]
        fn prop_sanitized_text_is_all_digits(s in ".*") {
            prop_assert!(sanitize(&s).bytes().all(|b| b.is_ascii_digit()));
        }

        #[test]
        fn prop_parse_reads_back_rendered_numbers(n in any::<u32>()) {
            prop_assert_eq!(parse(&n.to_string()), Some(n));
        }
    }
}
