//! Editor configuration.
//!
//! The configuration is plain data so it can be deserialized straight from
//! the client (camelCase keys, every field optional).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest zoom factor the viewport accepts.
pub const MIN_SCALE: f64 = 1.0;
/// Largest zoom factor the viewport accepts.
pub const MAX_SCALE: f64 = 3.0;

/// Error types for invalid editor configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Scale limits are non-finite, non-positive, or inverted.
    #[error("Invalid scale limits: min {min}, max {max}")]
    InvalidScaleLimits { min: f64, max: f64 },

    /// Frame dimensions are non-finite or not positive.
    #[error("Invalid frame size: {width}x{height}")]
    InvalidFrame { width: f64, height: f64 },
}

/// Size of the fixed display frame the image preview is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSize {
    /// Frame width in pixels.
    pub width: f64,
    /// Frame height in pixels.
    pub height: f64,
}

impl FrameSize {
    /// Create a frame size, rejecting degenerate dimensions.
    pub fn new(width: f64, height: f64) -> Result<Self, ConfigError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(ConfigError::InvalidFrame { width, height });
        }
        Ok(Self { width, height })
    }
}

/// Tunables for one editor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Lower zoom limit.
    pub min_scale: f64,
    /// Upper zoom limit.
    pub max_scale: f64,
    /// Send the visible viewport as a crop region with each commit.
    pub crop_on_commit: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            crop_on_commit: false,
        }
    }
}

impl EditorConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that the scale limits describe a usable range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_scale, self.max_scale);
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
            return Err(ConfigError::InvalidScaleLimits { min, max });
        }
        Ok(())
    }
}
