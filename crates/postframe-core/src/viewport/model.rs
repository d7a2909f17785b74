//! Owned viewport transform with clamped mutation.

use serde::{Deserialize, Serialize};

use super::bounds::{clamp_offset, compute_bound};
use crate::config::{ConfigError, EditorConfig, FrameSize};

/// Pan and zoom applied to the preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransform {
    /// Zoom factor.
    pub scale: f64,
    /// Horizontal pan offset in frame pixels.
    pub x: f64,
    /// Vertical pan offset in frame pixels.
    pub y: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            x: 0.0,
            y: 0.0,
        }
    }
}

impl ViewportTransform {
    /// Check if the transform is at its defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Region of the image visible through the frame, in normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    /// Left edge (0.0 to 1.0)
    pub left: f64,
    /// Top edge (0.0 to 1.0)
    pub top: f64,
    /// Width (0.0 to 1.0)
    pub width: f64,
    /// Height (0.0 to 1.0)
    pub height: f64,
}

impl CropRegion {
    /// The whole image.
    pub const FULL: CropRegion = CropRegion {
        left: 0.0,
        top: 0.0,
        width: 1.0,
        height: 1.0,
    };

    /// Check if this region covers the whole image.
    pub fn is_full(&self) -> bool {
        self.left <= 0.0 && self.top <= 0.0 && self.width >= 1.0 && self.height >= 1.0
    }
}

/// The single writer of a [`ViewportTransform`].
///
/// Every mutation goes through [`apply_scale`](Self::apply_scale),
/// [`apply_offset`](Self::apply_offset) or [`reset`](Self::reset), and each
/// of them leaves `|x| <= horizontal bound` and `|y| <= vertical bound`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportModel {
    frame: FrameSize,
    min_scale: f64,
    max_scale: f64,
    transform: ViewportTransform,
}

impl ViewportModel {
    /// Create a model at the default transform.
    pub fn new(frame: FrameSize, config: &EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let frame = FrameSize::new(frame.width, frame.height)?;
        let mut model = Self {
            frame,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            transform: ViewportTransform::default(),
        };
        // A config whose range excludes 1.0 still starts inside the range.
        model.reset();
        Ok(model)
    }

    /// Current transform.
    pub fn transform(&self) -> ViewportTransform {
        self.transform
    }

    /// Current scale.
    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    /// Display frame this model clamps against.
    pub fn frame(&self) -> FrameSize {
        self.frame
    }

    /// Scale limits as `(min, max)`.
    pub fn scale_limits(&self) -> (f64, f64) {
        (self.min_scale, self.max_scale)
    }

    /// Maximum pan offsets `(horizontal, vertical)` at the current scale.
    pub fn bounds(&self) -> (f64, f64) {
        (
            compute_bound(self.frame.width, self.transform.scale),
            compute_bound(self.frame.height, self.transform.scale),
        )
    }

    /// Transform a freshly opened editor starts from.
    pub fn default_transform(&self) -> ViewportTransform {
        ViewportTransform {
            scale: 1.0_f64.clamp(self.min_scale, self.max_scale),
            x: 0.0,
            y: 0.0,
        }
    }

    /// Restore `{scale: 1, x: 0, y: 0}`.
    pub fn reset(&mut self) {
        self.transform = self.default_transform();
    }

    /// Clamp a scale into the configured limits.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        if scale.is_nan() {
            return self.transform.scale;
        }
        scale.clamp(self.min_scale, self.max_scale)
    }

    /// Store a new scale, clamped to the limits.
    ///
    /// The stored offsets are re-clamped against the new bounds, so zooming
    /// out never leaves the image panned past the frame edge.
    pub fn apply_scale(&mut self, new_scale: f64) {
        self.transform.scale = self.clamp_scale(new_scale);
        let (x, y) = (self.transform.x, self.transform.y);
        self.apply_offset(x, y);
    }

    /// Multiply the current scale by `factor`.
    pub fn zoom_by(&mut self, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.apply_scale(self.transform.scale * factor);
    }

    /// Store new pan offsets, clamped to the bounds of the current scale.
    pub fn apply_offset(&mut self, new_x: f64, new_y: f64) {
        let (bound_x, bound_y) = self.bounds();
        self.transform.x = clamp_offset(new_x, bound_x);
        self.transform.y = clamp_offset(new_y, bound_y);
    }

    /// Normalized image region visible through the frame.
    ///
    /// The image fills the frame at scale 1, so the visible window is
    /// `1 / scale` of each dimension, shifted against the pan direction.
    pub fn crop_region(&self) -> CropRegion {
        let ViewportTransform { scale, x, y } = self.transform;
        if scale <= 1.0 {
            return CropRegion::FULL;
        }
        let size = 1.0 / scale;
        let left = 0.5 - size / 2.0 - x / (self.frame.width * scale);
        let top = 0.5 - size / 2.0 - y / (self.frame.height * scale);
        CropRegion {
            left: left.clamp(0.0, 1.0 - size),
            top: top.clamp(0.0, 1.0 - size),
            width: size,
            height: size,
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn frame_strategy() -> impl Strategy<Value = FrameSize> {
        (10.0f64..=2000.0, 10.0f64..=2000.0).prop_map(|(width, height)| FrameSize { width, height })
    }

    proptest! {
        /// Property: Any mix of scale and offset updates keeps offsets in bounds.
        #[test]
        fn prop_offsets_stay_within_bounds(
            frame in frame_strategy(),
            ops in prop::collection::vec((0.1f64..=5.0, -5000.0f64..=5000.0, -5000.0f64..=5000.0), 1..30),
        ) {
            let mut m = ViewportModel::new(frame, &EditorConfig::default()).unwrap();
            for (scale, x, y) in ops {
                m.apply_scale(scale);
                m.apply_offset(x, y);
                let t = m.transform();
                let (bx, by) = m.bounds();
                prop_assert!(t.scale >= 1.0 && t.scale <= 3.0);
                prop_assert!(t.x.abs() <= bx);
                prop_assert!(t.y.abs() <= by);
            }
        }

        /// Property: The crop region always lies inside the image.
        #[test]
        fn prop_crop_region_inside_image(
            frame in frame_strategy(),
            scale in 1.0f64..=3.0,
            x in -5000.0f64..=5000.0,
            y in -5000.0f64..=5000.0,
        ) {
            let mut m = ViewportModel::new(frame, &EditorConfig::default()).unwrap();
            m.apply_scale(scale);
            m.apply_offset(x, y);
            let crop = m.crop_region();
            prop_assert!(crop.left >= 0.0 && crop.top >= 0.0);
            prop_assert!(crop.left + crop.width <= 1.0 + 1e-9);
            prop_assert!(crop.top + crop.height <= 1.0 + 1e-9);
        }

        /// Property: Reset is idempotent.
        #[test]
        fn prop_reset_idempotent(
            frame in frame_strategy(),
            scale in 0.1f64..=5.0,
            x in -500.0f64..=500.0,
        ) {
            let mut m = ViewportModel::new(frame, &EditorConfig::default()).unwrap();
            m.apply_scale(scale);
            m.apply_offset(x, x);
            m.reset();
            let once = m.clone();
            m.reset();
            prop_assert_eq!(once, m);
        }
    }
}
