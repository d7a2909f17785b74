//! JavaScript-backed image processor and commit observer.
//!
//! The client supplies a function `(job, reportProgress) => Promise<string>`
//! that bakes rotation, flips and crop into a new image and resolves with its
//! reference. Progress reported from JavaScript is forwarded into the
//! commit's own progress stream while the promise is pending. Calls to
//! `reportProgress` after the promise settles are ignored.

use std::pin::pin;

use futures_channel::mpsc;
use futures_util::future::{select, Either};
use futures_util::StreamExt;
use js_sys::Function;
use postframe_core::commit::{CommitId, CommitObserver, CommitPhase};
use postframe_core::{ImageProcessor, ProcessedImage, ProcessingJob, ProgressReporter};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Failure reported by the JavaScript processor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct JsProcessorError(pub String);

/// Best-effort message from a thrown or rejected JavaScript value.
pub(crate) fn describe_js_error(value: &JsValue) -> String {
    if let Some(message) = value.as_string() {
        return message;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{value:?}")
}

/// Pull the image reference out of the processor's resolved value.
///
/// Accepts a bare string or an object with a `resultRef` property.
fn result_ref_from(value: &JsValue) -> Option<String> {
    if let Some(s) = value.as_string() {
        return Some(s);
    }
    js_sys::Reflect::get(value, &JsValue::from_str("resultRef"))
        .ok()
        .and_then(|v| v.as_string())
}

/// Percentage from JavaScript, clamped into `0..=100`.
pub(crate) fn percent_from_f64(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    // In range after the clamp, so the cast cannot truncate.
    value.clamp(0.0, 100.0).round() as u8
}

/// [`ImageProcessor`] that delegates to a JavaScript function.
pub struct JsImageProcessor {
    callback: Function,
}

impl JsImageProcessor {
    pub fn new(callback: Function) -> Self {
        Self { callback }
    }
}

impl ImageProcessor for JsImageProcessor {
    type Error = JsProcessorError;

    async fn process(
        &self,
        job: &ProcessingJob,
        progress: &mut ProgressReporter<'_>,
    ) -> Result<ProcessedImage, JsProcessorError> {
        let job_js = serde_wasm_bindgen::to_value(job)
            .map_err(|e| JsProcessorError(format!("Invalid job: {e}")))?;

        let (tx, mut rx) = mpsc::unbounded::<u8>();
        // Owned by the JS side: a processor may keep `reportProgress` and call
        // it after its promise settles. Those late sends hit a closed channel
        // and are dropped.
        let report = Closure::<dyn FnMut(f64)>::new(move |value: f64| {
            let _ = tx.unbounded_send(percent_from_f64(value));
        })
        .into_js_value();

        let returned = self
            .callback
            .call2(&JsValue::NULL, &job_js, &report)
            .map_err(|e| JsProcessorError(describe_js_error(&e)))?;
        let mut pending = pin!(JsFuture::from(js_sys::Promise::resolve(&returned)));

        let settled = loop {
            match select(rx.next(), pending.as_mut()).await {
                Either::Left((Some(percent), _)) => progress.report(percent),
                Either::Left((None, rest)) => break rest.await,
                Either::Right((settled, _)) => break settled,
            }
        };
        // Drain what was reported in the same tick as the resolution.
        rx.close();
        while let Some(percent) = rx.next().await {
            progress.report(percent);
        }

        let value = settled.map_err(|e| JsProcessorError(describe_js_error(&e)))?;
        let result_ref = result_ref_from(&value)
            .ok_or_else(|| JsProcessorError("Processor did not resolve to an image reference".into()))?;
        Ok(ProcessedImage::new(result_ref))
    }
}

/// [`CommitObserver`] forwarding to optional JavaScript callbacks.
#[derive(Default)]
pub struct JsCommitObserver {
    on_loading: Option<Function>,
    on_phase: Option<Function>,
}

impl JsCommitObserver {
    pub fn new(on_loading: Option<Function>, on_phase: Option<Function>) -> Self {
        Self {
            on_loading,
            on_phase,
        }
    }
}

impl CommitObserver for JsCommitObserver {
    fn phase_changed(&self, id: CommitId, phase: CommitPhase) {
        let Some(callback) = &self.on_phase else {
            return;
        };
        let phase = match serde_wasm_bindgen::to_value(&phase) {
            Ok(phase) => phase,
            Err(e) => {
                tracing::debug!("Unable to convert commit phase: {e}");
                return;
            }
        };
        if let Err(e) = callback.call2(&JsValue::NULL, &commit_id_value(id), &phase) {
            tracing::debug!("Phase callback threw: {}", describe_js_error(&e));
        }
    }

    fn loading_changed(&self, id: CommitId, loading: bool) {
        let Some(callback) = &self.on_loading else {
            return;
        };
        if let Err(e) = callback.call2(
            &JsValue::NULL,
            &commit_id_value(id),
            &JsValue::from_bool(loading),
        ) {
            tracing::debug!("Loading callback threw: {}", describe_js_error(&e));
        }
    }
}

fn commit_id_value(id: CommitId) -> JsValue {
    // Commit ids stay far below 2^53, the exact integer range of a JS number.
    JsValue::from_f64(id.0 as f64)
}
