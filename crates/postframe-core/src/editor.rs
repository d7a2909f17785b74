//! One open media editor: the owner of all transform state.
//!
//! The session is the only writer of its viewport and edit options. Input
//! events are applied in arrival order and never suspend; committing takes a
//! snapshot, so a commit in flight (or a failed one) cannot touch the
//! session.

use serde::{Deserialize, Serialize};

use crate::commit::{CommitRequest, SourceImageRef};
use crate::config::{ConfigError, EditorConfig, FrameSize};
use crate::edit::{EditOptions, FilterId, FlipAxis};
use crate::gesture::{GestureMode, GestureSession, PointerEvent};
use crate::render::RenderTransform;
use crate::viewport::{ViewportModel, ViewportTransform};

/// Serializable view of the editor state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub viewport: ViewportTransform,
    pub edit_options: EditOptions,
    pub gesture: GestureMode,
    pub css_transform: String,
    pub css_filter: String,
}

/// State of an open editor.
#[derive(Debug, Clone)]
pub struct EditorSession {
    config: EditorConfig,
    viewport: ViewportModel,
    edits: EditOptions,
    gesture: GestureSession,
}

impl EditorSession {
    /// Open an editor over a display frame.
    pub fn open(frame: FrameSize, config: EditorConfig) -> Result<Self, ConfigError> {
        let viewport = ViewportModel::new(frame, &config)?;
        tracing::debug!(
            "Editor opened: frame {}x{}, scale {}..{}",
            frame.width,
            frame.height,
            config.min_scale,
            config.max_scale
        );
        Ok(Self {
            config,
            viewport,
            edits: EditOptions::default(),
            gesture: GestureSession::Idle,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn viewport(&self) -> &ViewportModel {
        &self.viewport
    }

    pub fn transform(&self) -> ViewportTransform {
        self.viewport.transform()
    }

    pub fn edit_options(&self) -> &EditOptions {
        &self.edits
    }

    pub fn gesture(&self) -> &GestureSession {
        &self.gesture
    }

    /// Apply one pointer event.
    ///
    /// Malformed events are dropped and logged; they never reach the user.
    pub fn handle_event(&mut self, event: &PointerEvent) {
        let before = self.gesture.mode();
        if let Err(err) = self.gesture.handle(event, &mut self.viewport) {
            tracing::debug!("Ignoring {:?} event: {err}", event.phase);
            return;
        }
        let after = self.gesture.mode();
        if before != after {
            tracing::trace!("Gesture {before:?} -> {after:?}");
        }
    }

    pub fn rotate(&mut self, delta_degrees: i32) {
        self.edits.rotate(delta_degrees);
    }

    pub fn toggle_flip(&mut self, axis: FlipAxis) {
        self.edits.toggle_flip(axis);
    }

    pub fn set_filter(&mut self, filter: Option<FilterId>) {
        self.edits.set_filter(filter);
    }

    /// Discrete zoom, e.g. from zoom buttons or a wheel.
    ///
    /// An active pinch is re-anchored to the new scale so its next move
    /// builds on this zoom instead of replacing it.
    pub fn zoom_by(&mut self, factor: f64) {
        self.viewport.zoom_by(factor);
        self.gesture.rebase_scale(self.viewport.scale());
    }

    /// Restore the viewport and edit options together and drop any active
    /// gesture.
    pub fn reset(&mut self) {
        self.viewport.reset();
        self.edits.reset();
        self.gesture = GestureSession::Idle;
    }

    /// True if anything differs from a freshly opened editor.
    pub fn has_changes(&self) -> bool {
        !self.edits.is_default() || self.viewport.transform() != self.viewport.default_transform()
    }

    pub fn render_transform(&self) -> RenderTransform {
        RenderTransform::compose(&self.viewport.transform(), &self.edits)
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        let render = self.render_transform();
        EditorSnapshot {
            viewport: self.viewport.transform(),
            edit_options: self.edits,
            gesture: self.gesture.mode(),
            css_transform: render.css_transform(),
            css_filter: render.css_filter().to_string(),
        }
    }

    /// Build the request handed to the commit pipeline.
    ///
    /// The visible viewport is included as a crop only when the
    /// configuration asks for it.
    pub fn commit_request(&self, source: Option<SourceImageRef>) -> CommitRequest {
        let request = CommitRequest::new(source, self.edits);
        if self.config.crop_on_commit {
            request.with_crop(self.viewport.crop_region())
        } else {
            request
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::{
        CommitError, CommitPipeline, ImageProcessor, ProcessedImage, ProcessingJob,
        ProgressReporter,
    };
    use crate::gesture::Point;
    use futures_lite::future;
    use thiserror::Error;

    fn session() -> EditorSession {
        let frame = FrameSize::new(400.0, 400.0).unwrap();
        EditorSession::open(frame, EditorConfig::default()).unwrap()
    }

    fn pinch(session: &mut EditorSession, from: f64, to: f64) {
        let origin = Point::new(0.0, 0.0);
        session.handle_event(&PointerEvent::start(&[origin, Point::new(from, 0.0)]));
        session.handle_event(&PointerEvent::moved(&[origin, Point::new(to, 0.0)]));
        session.handle_event(&PointerEvent::end());
    }

    fn drag(session: &mut EditorSession, dx: f64, dy: f64) {
        session.handle_event(&PointerEvent::start(&[Point::new(100.0, 100.0)]));
        session.handle_event(&PointerEvent::moved(&[Point::new(100.0 + dx, 100.0 + dy)]));
        session.handle_event(&PointerEvent::end());
    }

    #[test]
    fn test_open_with_invalid_frame() {
        let frame = FrameSize {
            width: 0.0,
            height: 100.0,
        };
        assert!(EditorSession::open(frame, EditorConfig::default()).is_err());
    }

    #[test]
    fn test_pinch_then_pan() {
        let mut s = session();
        pinch(&mut s, 100.0, 200.0);
        assert!((s.transform().scale - 2.0).abs() < 1e-12);
        assert!(s.gesture().is_idle());

        drag(&mut s, 30.0, -40.0);
        assert_eq!(s.transform().x, 30.0);
        assert_eq!(s.transform().y, -40.0);
        assert!(s.has_changes());
    }

    #[test]
    fn test_malformed_event_is_swallowed() {
        let mut s = session();
        s.handle_event(&PointerEvent::moved(&[Point::new(1.0, 1.0)]));
        s.handle_event(&PointerEvent::start(&[]));
        assert!(s.gesture().is_idle());
        assert!(!s.has_changes());
    }

    #[test]
    fn test_zoom_during_pinch_is_kept() {
        let mut s = session();
        let origin = Point::new(0.0, 0.0);
        s.handle_event(&PointerEvent::start(&[origin, Point::new(100.0, 0.0)]));
        s.zoom_by(2.0);
        assert_eq!(s.transform().scale, 2.0);

        s.handle_event(&PointerEvent::moved(&[origin, Point::new(101.0, 0.0)]));
        assert_eq!(s.transform().scale, 2.0);

        s.handle_event(&PointerEvent::moved(&[origin, Point::new(111.1, 0.0)]));
        assert!((s.transform().scale - 2.2).abs() < 1e-9);
        assert_eq!(s.gesture().mode(), GestureMode::Pinch);
    }

    #[test]
    fn test_reset_restores_everything() {
        let mut s = session();
        pinch(&mut s, 100.0, 250.0);
        drag(&mut s, 50.0, 50.0);
        s.rotate(90);
        s.toggle_flip(FlipAxis::Horizontal);
        s.set_filter(Some(FilterId::Fade));
        s.handle_event(&PointerEvent::start(&[Point::new(1.0, 1.0)]));

        s.reset();
        assert!(s.transform().is_default());
        assert!(s.edit_options().is_default());
        assert!(s.gesture().is_idle());
        assert!(!s.has_changes());

        let once = s.snapshot();
        s.reset();
        assert_eq!(s.snapshot(), once);
    }

    #[test]
    fn test_snapshot_reflects_render_transform() {
        let mut s = session();
        s.zoom_by(1.5);
        s.rotate(-90);
        s.set_filter(Some(FilterId::Grayscale));
        let snap = s.snapshot();
        assert_eq!(snap.edit_options.rotation_degrees, 270);
        assert_eq!(
            snap.css_transform,
            "translate(0px, 0px) scale(1.5) rotate(270deg)"
        );
        assert_eq!(snap.css_filter, "grayscale(100%)");
        assert_eq!(snap.gesture, GestureMode::None);
    }

    #[test]
    fn test_commit_request_crop_follows_config() {
        let mut s = session();
        s.zoom_by(2.0);
        assert_eq!(s.commit_request(Some("a".into())).crop, None);

        let frame = FrameSize::new(400.0, 400.0).unwrap();
        let config = EditorConfig {
            crop_on_commit: true,
            ..EditorConfig::default()
        };
        let mut s = EditorSession::open(frame, config).unwrap();
        s.zoom_by(2.0);
        let crop = s.commit_request(Some("a".into())).crop.unwrap();
        assert!((crop.width - 0.5).abs() < 1e-12);
    }

    #[derive(Debug, Error)]
    #[error("upload rejected")]
    struct Rejected;

    struct AlwaysFails;

    impl ImageProcessor for AlwaysFails {
        type Error = Rejected;

        async fn process(
            &self,
            _job: &ProcessingJob,
            _progress: &mut ProgressReporter<'_>,
        ) -> Result<ProcessedImage, Rejected> {
            Err(Rejected)
        }
    }

    #[test]
    fn test_failed_commit_leaves_session_untouched() {
        let mut s = session();
        pinch(&mut s, 100.0, 300.0);
        s.rotate(180);
        s.set_filter(Some(FilterId::Warm));
        let before = s.snapshot();

        let pipeline = CommitPipeline::new(AlwaysFails);
        let result = future::block_on(pipeline.commit(s.commit_request(Some("a".into())), |_| {}));
        assert!(matches!(result, Err(CommitError::ProcessingFailed(_))));
        assert_eq!(s.snapshot(), before);
    }
}
