//! Editor session bindings.
//!
//! `JsEditorSession` owns one open editor. Pointer events are applied
//! synchronously; `commit` returns a Promise and works on a snapshot, so the
//! session stays usable while a commit is in flight.

use std::rc::Rc;

use js_sys::{Function, Promise};
use postframe_core::commit::CommitError;
use postframe_core::{
    CommitPipeline, EditorConfig, EditorSession, FrameSize, PointerEvent, SourceImageRef,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::processor::{JsCommitObserver, JsImageProcessor};
use crate::types::{axis_from_str, filter_from_str, phase_from_str, points_from_flat};

type JsPipeline = CommitPipeline<JsImageProcessor, JsCommitObserver>;

fn to_js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

/// Named JS error for a failed commit, so callers can tell the kinds apart.
fn commit_error_to_js(err: &CommitError) -> JsValue {
    let js_err = js_sys::Error::new(&err.to_string());
    let name = match err {
        CommitError::InvalidSource => "InvalidSourceError",
        CommitError::ProcessingFailed(_) => "ProcessingFailedError",
    };
    js_err.set_name(name);
    js_err.into()
}

/// An open media editor.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const editor = new JsEditorSession(360, 360, processImage, { cropOnCommit: true });
/// canvas.onpointerdown = (e) => editor.pointer("start", [e.offsetX, e.offsetY]);
/// preview.style.transform = editor.cssTransform();
/// const { resultRef, filterId } = await editor.commit(blobUrl, (p) => bar.value = p);
/// ```
#[wasm_bindgen]
pub struct JsEditorSession {
    session: EditorSession,
    pipeline: Rc<JsPipeline>,
}

#[wasm_bindgen]
impl JsEditorSession {
    /// Open an editor over a display frame.
    ///
    /// # Arguments
    /// * `frame_width`, `frame_height` - Display frame size in CSS pixels
    /// * `processor` - `(job, reportProgress) => Promise<string>`;
    ///   `reportProgress` may be kept and called later, calls after the
    ///   promise settles are ignored
    /// * `config` - Optional `{ minScale, maxScale, cropOnCommit }`
    /// * `on_loading` - Optional `(commitId, loading) => void`
    /// * `on_phase` - Optional `(commitId, { phase, stage? }) => void`
    #[wasm_bindgen(constructor)]
    pub fn new(
        frame_width: f64,
        frame_height: f64,
        processor: Function,
        config: JsValue,
        on_loading: Option<Function>,
        on_phase: Option<Function>,
    ) -> Result<JsEditorSession, JsValue> {
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| to_js_error(format!("Invalid editor config: {e}")))?
        };
        let frame = FrameSize::new(frame_width, frame_height).map_err(to_js_error)?;
        let session = EditorSession::open(frame, config).map_err(to_js_error)?;
        let pipeline = CommitPipeline::with_observer(
            JsImageProcessor::new(processor),
            JsCommitObserver::new(on_loading, on_phase),
        );
        Ok(Self {
            session,
            pipeline: Rc::new(pipeline),
        })
    }

    /// Apply a pointer event given as flat coordinates `[x0, y0, x1, y1]`.
    ///
    /// Unknown phases and malformed events are ignored.
    pub fn pointer(&mut self, phase: &str, coords: &[f64]) {
        let Some(phase) = phase_from_str(phase) else {
            tracing::debug!("Ignoring pointer event with phase {phase:?}");
            return;
        };
        let event = PointerEvent::new(phase, points_from_flat(coords));
        self.session.handle_event(&event);
    }

    /// Apply a pointer event object `{ phase, points: [{ x, y }] }`.
    #[wasm_bindgen(js_name = handleEvent)]
    pub fn handle_event(&mut self, event: JsValue) {
        match serde_wasm_bindgen::from_value::<PointerEvent>(event) {
            Ok(event) => self.session.handle_event(&event),
            Err(e) => tracing::debug!("Ignoring malformed pointer event: {e}"),
        }
    }

    /// Rotate by a number of degrees (use +/-90 for the rotate buttons).
    pub fn rotate(&mut self, delta_degrees: i32) {
        self.session.rotate(delta_degrees);
    }

    /// Toggle a flip axis: `"horizontal"` or `"vertical"`.
    #[wasm_bindgen(js_name = toggleFlip)]
    pub fn toggle_flip(&mut self, axis: &str) -> Result<(), JsValue> {
        let axis = axis_from_str(axis).ok_or_else(|| to_js_error(format!("Unknown axis: {axis}")))?;
        self.session.toggle_flip(axis);
        Ok(())
    }

    /// Select a filter by id, or clear it with `null`.
    #[wasm_bindgen(js_name = setFilter)]
    pub fn set_filter(&mut self, filter: Option<String>) -> Result<(), JsValue> {
        let filter = filter_from_str(filter.as_deref()).map_err(to_js_error)?;
        self.session.set_filter(filter);
        Ok(())
    }

    /// Zoom by a factor, e.g. from zoom buttons.
    #[wasm_bindgen(js_name = zoomBy)]
    pub fn zoom_by(&mut self, factor: f64) {
        self.session.zoom_by(factor);
    }

    /// Restore pan, zoom, rotation, flips and filter.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.session.transform().scale
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.session.transform().x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.session.transform().y
    }

    #[wasm_bindgen(getter, js_name = rotationDegrees)]
    pub fn rotation_degrees(&self) -> u16 {
        self.session.edit_options().rotation_degrees
    }

    #[wasm_bindgen(getter, js_name = hasChanges)]
    pub fn has_changes(&self) -> bool {
        self.session.has_changes()
    }

    /// CSS `transform` for the preview element.
    #[wasm_bindgen(js_name = cssTransform)]
    pub fn css_transform(&self) -> String {
        self.session.render_transform().css_transform()
    }

    /// CSS `filter` for the preview element.
    #[wasm_bindgen(js_name = cssFilter)]
    pub fn css_filter(&self) -> String {
        self.session.render_transform().css_filter().to_string()
    }

    /// Affine matrix `[a, b, c, d, e, f]` for canvas rendering.
    pub fn matrix(&self) -> Vec<f64> {
        self.session.render_transform().matrix().to_vec()
    }

    /// Full editor state as a plain object.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.snapshot()).map_err(to_js_error)
    }

    /// Commit the current edit.
    ///
    /// Resolves with `{ resultRef, filterId }`. Rejects with an
    /// `InvalidSourceError` when `source` is missing, or a
    /// `ProcessingFailedError` when the processor fails. The editor state is
    /// left as is either way.
    pub fn commit(&self, source: Option<String>, on_progress: Option<Function>) -> Promise {
        let request = self
            .session
            .commit_request(source.map(SourceImageRef::from));
        let pipeline = Rc::clone(&self.pipeline);

        future_to_promise(async move {
            let report = |percent: u8| {
                if let Some(callback) = &on_progress {
                    let _ = callback.call1(&JsValue::NULL, &JsValue::from(percent));
                }
            };
            match pipeline.commit(request, report).await {
                Ok(result) => serde_wasm_bindgen::to_value(&result).map_err(to_js_error),
                Err(err) => Err(commit_error_to_js(&err)),
            }
        })
    }
}

/// WASM-specific tests that require JsValue.
///
/// These can only run on wasm32 targets. Use `wasm-pack test` to run them.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn echo_processor() -> Function {
        Function::new_with_args(
            "job, report",
            "report(50); return Promise.resolve('processed:' + job.source);",
        )
    }

    fn session() -> JsEditorSession {
        JsEditorSession::new(400.0, 400.0, echo_processor(), JsValue::UNDEFINED, None, None)
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn test_pinch_zoom() {
        let mut editor = session();
        editor.pointer("start", &[0.0, 0.0, 100.0, 0.0]);
        editor.pointer("move", &[0.0, 0.0, 200.0, 0.0]);
        editor.pointer("end", &[]);
        assert!((editor.scale() - 2.0).abs() < 1e-12);
    }

    #[wasm_bindgen_test]
    fn test_unknown_filter_rejected() {
        let mut editor = session();
        assert!(editor.set_filter(Some("lomo".to_string())).is_err());
        assert!(editor.set_filter(Some("sepia".to_string())).is_ok());
        assert_eq!(editor.css_filter(), "sepia(80%)");
    }

    #[wasm_bindgen_test]
    async fn test_commit_resolves_with_result() {
        let mut editor = session();
        editor.rotate(90);
        let value = JsFuture::from(editor.commit(Some("blob:1".to_string()), None))
            .await
            .unwrap();
        let result_ref = js_sys::Reflect::get(&value, &JsValue::from_str("resultRef")).unwrap();
        assert_eq!(result_ref.as_string().as_deref(), Some("processed:blob:1"));
    }

    #[wasm_bindgen_test]
    async fn test_late_progress_report_is_ignored() {
        let holder = js_sys::Object::new();
        let processor: Function = Function::new_with_args(
            "holder",
            "return (job, report) => { holder.report = report; report(10); return Promise.resolve('done'); };",
        )
        .call1(&JsValue::NULL, &holder)
        .unwrap()
        .unchecked_into();
        let editor =
            JsEditorSession::new(400.0, 400.0, processor, JsValue::UNDEFINED, None, None).unwrap();

        let seen = js_sys::Array::new();
        let on_progress: Function = Function::new_with_args("seen", "return (p) => seen.push(p);")
            .call1(&JsValue::NULL, &seen)
            .unwrap()
            .unchecked_into();
        JsFuture::from(editor.commit(Some("blob:1".to_string()), Some(on_progress)))
            .await
            .unwrap();
        assert_eq!(seen.length(), 3);

        let report: Function = js_sys::Reflect::get(&holder, &JsValue::from_str("report"))
            .unwrap()
            .unchecked_into();
        assert!(report.call1(&JsValue::NULL, &JsValue::from(90)).is_ok());
        assert_eq!(seen.length(), 3);
    }

    #[wasm_bindgen_test]
    async fn test_commit_without_source_rejects() {
        let editor = session();
        let err = JsFuture::from(editor.commit(None, None)).await.unwrap_err();
        let err: js_sys::Error = err.unchecked_into();
        assert_eq!(String::from(err.name()), "InvalidSourceError");
    }
}
