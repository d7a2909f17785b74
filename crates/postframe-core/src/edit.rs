//! Discrete edit options: quarter-turn rotation, flips and a style filter.
//!
//! These are independent of pan and zoom. Rotation and flips are geometric
//! and handed to the image processor on commit; the filter is a
//! presentation-time style that is passed through untouched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A filter identifier was not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown filter: {0}")]
pub struct UnknownFilter(pub String);

/// Style filters offered in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterId {
    Grayscale,
    Sepia,
    Vintage,
    Warm,
    Cool,
    Fade,
    Vivid,
}

impl FilterId {
    /// All filters in display order.
    pub const ALL: [FilterId; 7] = [
        FilterId::Grayscale,
        FilterId::Sepia,
        FilterId::Vintage,
        FilterId::Warm,
        FilterId::Cool,
        FilterId::Fade,
        FilterId::Vivid,
    ];

    /// Stable identifier used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterId::Grayscale => "grayscale",
            FilterId::Sepia => "sepia",
            FilterId::Vintage => "vintage",
            FilterId::Warm => "warm",
            FilterId::Cool => "cool",
            FilterId::Fade => "fade",
            FilterId::Vivid => "vivid",
        }
    }

    /// Human-readable name for the filter picker.
    pub fn label(self) -> &'static str {
        match self {
            FilterId::Grayscale => "Grayscale",
            FilterId::Sepia => "Sepia",
            FilterId::Vintage => "Vintage",
            FilterId::Warm => "Warm",
            FilterId::Cool => "Cool",
            FilterId::Fade => "Fade",
            FilterId::Vivid => "Vivid",
        }
    }

    /// CSS `filter` value rendering this style.
    pub fn css(self) -> &'static str {
        match self {
            FilterId::Grayscale => "grayscale(100%)",
            FilterId::Sepia => "sepia(80%)",
            FilterId::Vintage => "sepia(40%) contrast(110%) saturate(80%)",
            FilterId::Warm => "sepia(20%) saturate(140%) hue-rotate(-10deg)",
            FilterId::Cool => "saturate(110%) hue-rotate(20deg)",
            FilterId::Fade => "contrast(85%) brightness(110%) saturate(70%)",
            FilterId::Vivid => "contrast(120%) saturate(160%)",
        }
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterId {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterId::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

/// Axis for a flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipAxis {
    Horizontal,
    Vertical,
}

/// Discrete adjustments applied on top of the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditOptions {
    /// Clockwise rotation, always in `0..360`.
    #[serde(deserialize_with = "deserialize_rotation")]
    pub rotation_degrees: u16,
    /// Mirror left-right.
    pub flip_horizontal: bool,
    /// Mirror top-bottom.
    pub flip_vertical: bool,
    /// Selected style filter.
    pub filter: Option<FilterId>,
}

impl EditOptions {
    /// Create edit options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Rotate by `delta_degrees`, keeping the result in `0..360`.
    ///
    /// Rotating -90 from 0 gives 270, never -90.
    pub fn rotate(&mut self, delta_degrees: i32) {
        let current = i64::from(self.rotation_degrees);
        self.rotation_degrees = normalize_rotation(current + i64::from(delta_degrees));
    }

    /// Invert the flip on one axis, leaving the other untouched.
    pub fn toggle_flip(&mut self, axis: FlipAxis) {
        match axis {
            FlipAxis::Horizontal => self.flip_horizontal = !self.flip_horizontal,
            FlipAxis::Vertical => self.flip_vertical = !self.flip_vertical,
        }
    }

    /// Select a filter, or clear it with `None`.
    pub fn set_filter(&mut self, filter: Option<FilterId>) {
        self.filter = filter;
    }

    /// Restore all fields to their defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True if the rotation swaps the displayed width and height.
    pub fn swaps_dimensions(&self) -> bool {
        matches!(self.rotation_degrees, 90 | 270)
    }
}

/// Fold any whole-degree angle into `0..360`.
pub(crate) fn normalize_rotation(degrees: i64) -> u16 {
    // rem_euclid(360) is always in 0..360
    u16::try_from(degrees.rem_euclid(360)).unwrap_or(0)
}

/// Accept any integer rotation from the wire and normalize it.
pub(crate) fn deserialize_rotation<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    i64::deserialize(deserializer).map(normalize_rotation)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Rotation stays in 0..360 for any delta sequence.
        #[test]
        fn prop_rotation_normalized(deltas in prop::collection::vec(any::<i32>(), 0..50)) {
            let mut opts = EditOptions::new();
            for d in deltas {
                opts.rotate(d);
                prop_assert!(opts.rotation_degrees < 360);
            }
        }

        /// Property: Rotation equals the Euclidean residue of the delta sum.
        #[test]
        fn prop_rotation_matches_sum(deltas in prop::collection::vec(-1000i32..=1000, 0..50)) {
            let mut opts = EditOptions::new();
            for d in &deltas {
                opts.rotate(*d);
            }
            let sum: i64 = deltas.iter().map(|d| i64::from(*d)).sum();
            prop_assert_eq!(i64::from(opts.rotation_degrees), sum.rem_euclid(360));
        }

        /// Property: Toggling the same axis twice is a no-op.
        #[test]
        fn prop_double_toggle_identity(horizontal in any::<bool>(), rotation in 0i32..360) {
            let mut opts = EditOptions::new();
            opts.rotate(rotation);
            let before = opts;
            let axis = if horizontal { FlipAxis::Horizontal } else { FlipAxis::Vertical };
            opts.toggle_flip(axis);
            opts.toggle_flip(axis);
            prop_assert_eq!(before, opts);
        }
    }
}
