//! Pan bounds for a zoomed image inside a fixed frame.
//!
//! The image is drawn to fill the frame at scale 1. Zooming in grows it
//! around the frame center, so the overflow on each side is half of the
//! extra size. That overflow is how far the image may be panned before an
//! edge would come into view.

/// Compute the maximum pan offset along one axis.
///
/// Returns `max(0, (frame_dimension * scale - frame_dimension) / 2)`.
/// The result is exactly `0.0` whenever `scale <= 1.0`, so panning is a
/// no-op until the image is zoomed past the frame.
///
/// # Arguments
///
/// * `frame_dimension` - Frame width or height in pixels
/// * `scale` - Current zoom factor
///
/// # Example
///
/// ```
/// use postframe_core::viewport::compute_bound;
///
/// assert_eq!(compute_bound(400.0, 1.0), 0.0);
/// assert_eq!(compute_bound(400.0, 2.0), 200.0);
/// ```
#[inline]
pub fn compute_bound(frame_dimension: f64, scale: f64) -> f64 {
    if scale <= 1.0 || !frame_dimension.is_finite() || frame_dimension <= 0.0 {
        return 0.0;
    }
    let bound = (frame_dimension * scale - frame_dimension) / 2.0;
    if bound.is_finite() {
        bound.max(0.0)
    } else {
        0.0
    }
}

/// Clamp a tentative offset into `[-bound, +bound]`.
#[inline]
pub fn clamp_offset(value: f64, bound: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(-bound, bound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_zero_at_native_size() {
        assert_eq!(compute_bound(300.0, 1.0), 0.0);
        assert_eq!(compute_bound(1.0, 1.0), 0.0);
    }

    #[test]
    fn test_bound_zero_when_zoomed_out() {
        assert_eq!(compute_bound(300.0, 0.5), 0.0);
    }

    #[test]
    fn test_bound_grows_with_scale() {
        // (300 * 2 - 300) / 2 = 150
        assert!((compute_bound(300.0, 2.0) - 150.0).abs() < 1e-9);
        // (300 * 3 - 300) / 2 = 300
        assert!((compute_bound(300.0, 3.0) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_bound_rejects_degenerate_frame() {
        assert_eq!(compute_bound(0.0, 2.0), 0.0);
        assert_eq!(compute_bound(-10.0, 2.0), 0.0);
        assert_eq!(compute_bound(f64::NAN, 2.0), 0.0);
    }

    #[test]
    fn test_clamp_offset() {
        assert_eq!(clamp_offset(50.0, 20.0), 20.0);
        assert_eq!(clamp_offset(-50.0, 20.0), -20.0);
        assert_eq!(clamp_offset(5.0, 20.0), 5.0);
        assert_eq!(clamp_offset(5.0, 0.0), 0.0);
        assert_eq!(clamp_offset(f64::NAN, 20.0), 0.0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
