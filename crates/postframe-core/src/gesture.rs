//! Pointer gesture recognition for the preview.
//!
//! A gesture session lives from a start event to the matching end or cancel
//! event. Its kind is decided once, at the start event: one contact point
//! pans, two contact points pinch. The session is an explicit tagged state so
//! a pinch can never silently turn into a pan.
//!
//! # Transitions
//!
//! ```text
//! Idle ──start(1 point)──▶ Panning ──end/cancel──▶ Idle
//! Idle ──start(2 points)─▶ Pinching ─end/cancel──▶ Idle
//! ```
//!
//! A start event that arrives while a session is active ends that session
//! first, so the only edges ever taken are the ones above.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::viewport::{clamp_offset, compute_bound, ViewportModel};

/// A contact point in frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Lifecycle phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Start,
    Move,
    End,
    Cancel,
}

/// A normalized pointer or touch event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Contact points currently down, in frame coordinates.
    pub points: Vec<Point>,
    /// Event phase.
    pub phase: Phase,
}

impl PointerEvent {
    pub fn new(phase: Phase, points: Vec<Point>) -> Self {
        Self { points, phase }
    }

    pub fn start(points: &[Point]) -> Self {
        Self::new(Phase::Start, points.to_vec())
    }

    pub fn moved(points: &[Point]) -> Self {
        Self::new(Phase::Move, points.to_vec())
    }

    pub fn end() -> Self {
        Self::new(Phase::End, Vec::new())
    }

    pub fn cancel() -> Self {
        Self::new(Phase::Cancel, Vec::new())
    }
}

/// Malformed input. The session state is unchanged when one of these is
/// returned; callers are expected to drop the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GestureInputError {
    /// A start or move event carried no contact points.
    #[error("Pointer event has no contact points")]
    NoPoints,

    /// A pinch move carried fewer than two contact points.
    #[error("Pinch event needs two contact points, got {0}")]
    TooFewPoints(usize),

    /// A move event arrived with no session open.
    #[error("Move event without an active gesture")]
    NoActiveSession,

    /// A contact point had a NaN or infinite coordinate.
    #[error("Contact point has a non-finite coordinate")]
    NonFinitePoint,
}

/// Kind of the active gesture, without its bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureMode {
    None,
    Pan,
    Pinch,
}

/// State of the current pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureSession {
    /// No interaction in progress.
    #[default]
    Idle,
    /// Single-pointer drag.
    Panning {
        /// Where the pointer was on the previous event.
        last_pointer: Point,
    },
    /// Two-pointer zoom.
    Pinching {
        /// Pointer distance when the pinch started. Zero until the two
        /// pointers are apart.
        initial_distance: f64,
        /// Viewport scale when the pinch started.
        initial_scale: f64,
    },
}

impl GestureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> GestureMode {
        match self {
            GestureSession::Idle => GestureMode::None,
            GestureSession::Panning { .. } => GestureMode::Pan,
            GestureSession::Pinching { .. } => GestureMode::Pinch,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, GestureSession::Idle)
    }

    /// Feed one event through the state machine, updating `viewport`.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        viewport: &mut ViewportModel,
    ) -> Result<(), GestureInputError> {
        // End and cancel never read their points.
        if matches!(event.phase, Phase::End | Phase::Cancel) {
            self.finish();
            return Ok(());
        }
        if event.points.iter().any(|p| !p.is_finite()) {
            return Err(GestureInputError::NonFinitePoint);
        }
        match event.phase {
            Phase::Start => self.start(&event.points, viewport),
            _ => self.update(&event.points, viewport),
        }
    }

    /// Re-anchor an active pinch after the scale was changed from outside
    /// the gesture. The next move with the pointers apart becomes the new
    /// baseline, so the outside change is kept.
    pub fn rebase_scale(&mut self, scale: f64) {
        if let GestureSession::Pinching {
            initial_distance,
            initial_scale,
        } = self
        {
            *initial_distance = 0.0;
            *initial_scale = scale;
        }
    }

    fn start(
        &mut self,
        points: &[Point],
        viewport: &ViewportModel,
    ) -> Result<(), GestureInputError> {
        let next = match points {
            [] => return Err(GestureInputError::NoPoints),
            [only] => GestureSession::Panning { last_pointer: *only },
            [a, b, ..] => GestureSession::Pinching {
                initial_distance: a.distance(b),
                initial_scale: viewport.scale(),
            },
        };
        if !self.is_idle() {
            tracing::debug!("Restarting gesture: {:?} -> {:?}", self.mode(), next.mode());
            self.finish();
        }
        *self = next;
        Ok(())
    }

    fn update(
        &mut self,
        points: &[Point],
        viewport: &mut ViewportModel,
    ) -> Result<(), GestureInputError> {
        match self {
            GestureSession::Idle => Err(GestureInputError::NoActiveSession),
            GestureSession::Panning { last_pointer } => {
                let current = *points.first().ok_or(GestureInputError::NoPoints)?;
                let scale = viewport.scale();
                if scale > 1.0 {
                    let frame = viewport.frame();
                    let t = viewport.transform();
                    let x = clamp_offset(
                        t.x + current.x - last_pointer.x,
                        compute_bound(frame.width, scale),
                    );
                    let y = clamp_offset(
                        t.y + current.y - last_pointer.y,
                        compute_bound(frame.height, scale),
                    );
                    viewport.apply_offset(x, y);
                }
                // Track the pointer even when clamped, so the next move does
                // not jump by the accumulated overshoot.
                *last_pointer = current;
                Ok(())
            }
            GestureSession::Pinching {
                initial_distance,
                initial_scale,
            } => {
                let [a, b, ..] = points else {
                    return Err(GestureInputError::TooFewPoints(points.len()));
                };
                let distance = a.distance(b);
                if *initial_distance == 0.0 {
                    if distance > 0.0 {
                        *initial_distance = distance;
                        *initial_scale = viewport.scale();
                    }
                    return Ok(());
                }
                viewport.apply_scale(*initial_scale * (distance / *initial_distance));
                Ok(())
            }
        }
    }

    fn finish(&mut self) {
        *self = GestureSession::Idle;
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::config::{EditorConfig, FrameSize};
    use proptest::prelude::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-2000.0f64..=2000.0, -2000.0f64..=2000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    proptest! {
        /// Property: Panning at native size never moves the image.
        #[test]
        fn prop_pan_noop_at_native_size(
            start in point_strategy(),
            moves in prop::collection::vec(point_strategy(), 1..40),
        ) {
            let frame = FrameSize::new(320.0, 480.0).unwrap();
            let mut vp = ViewportModel::new(frame, &EditorConfig::default()).unwrap();
            let mut g = GestureSession::new();
            g.handle(&PointerEvent::start(&[start]), &mut vp).unwrap();
            for m in moves {
                g.handle(&PointerEvent::moved(&[m]), &mut vp).unwrap();
                prop_assert_eq!(vp.transform().x, 0.0);
                prop_assert_eq!(vp.transform().y, 0.0);
            }
        }

        /// Property: Pinch scale follows the distance ratio, clamped.
        #[test]
        fn prop_pinch_scale_proportional(
            initial in 10.0f64..=500.0,
            ratio in 0.1f64..=5.0,
        ) {
            let frame = FrameSize::new(400.0, 400.0).unwrap();
            let mut vp = ViewportModel::new(frame, &EditorConfig::default()).unwrap();
            let mut g = GestureSession::new();
            let origin = Point::new(0.0, 0.0);
            g.handle(&PointerEvent::start(&[origin, Point::new(initial, 0.0)]), &mut vp).unwrap();
            g.handle(&PointerEvent::moved(&[origin, Point::new(initial * ratio, 0.0)]), &mut vp).unwrap();
            let expected = ratio.clamp(1.0, 3.0);
            prop_assert!((vp.scale() - expected).abs() < 1e-9);
        }

        /// Property: Arbitrary event streams keep the viewport invariant.
        #[test]
        fn prop_event_stream_keeps_invariant(
            events in prop::collection::vec(
                (0u8..4, prop::collection::vec(point_strategy(), 0..3)),
                1..60,
            ),
        ) {
            let frame = FrameSize::new(300.0, 200.0).unwrap();
            let mut vp = ViewportModel::new(frame, &EditorConfig::default()).unwrap();
            let mut g = GestureSession::new();
            for (phase, points) in events {
                let phase = match phase {
                    0 => Phase::Start,
                    1 => Phase::Move,
                    2 => Phase::End,
                    _ => Phase::Cancel,
                };
                let _ = g.handle(&PointerEvent::new(phase, points), &mut vp);
                let t = vp.transform();
                let (bx, by) = vp.bounds();
                prop_assert!(t.scale >= 1.0 && t.scale <= 3.0);
                prop_assert!(t.x.abs() <= bx && t.y.abs() <= by);
            }
        }
    }
}
