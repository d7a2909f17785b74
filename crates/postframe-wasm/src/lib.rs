//! Postframe WASM - WebAssembly bindings for the Postframe media editor
//!
//! This crate exposes the postframe-core editor to the JavaScript client.
//!
//! # Module Structure
//!
//! - `session` - The open editor: gestures, edit options, preview, commit
//! - `processor` - JavaScript-backed image processor and commit callbacks
//! - `types` - Conversions between JavaScript values and core types
//! - `logging` - `tracing` output to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { init_logging, JsEditorSession } from '@postframe/wasm';
//!
//! await init();
//! init_logging("postframe_core=debug");
//!
//! const editor = new JsEditorSession(360, 360, uploadEdited);
//! editor.rotate(-90);
//! const { resultRef, filterId } = await editor.commit(selectedImageUrl);
//! ```

use wasm_bindgen::prelude::*;

mod logging;
mod processor;
mod session;
mod types;

// Re-export public types
pub use processor::{JsCommitObserver, JsImageProcessor, JsProcessorError};
pub use session::JsEditorSession;

/// Route `tracing` output to the browser console.
///
/// `filter` uses the `RUST_LOG` directive syntax and defaults to `info`.
/// Only the first call has an effect.
#[wasm_bindgen]
pub fn init_logging(filter: Option<String>) {
    logging::init(filter.as_deref());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// List the available filters as `[{ id, label, css }]`.
#[wasm_bindgen]
pub fn filters() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&types::filter_catalog())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Maximum pan offset along one axis for a frame dimension and scale.
#[wasm_bindgen]
pub fn compute_bound(frame_dimension: f64, scale: f64) -> f64 {
    postframe_core::compute_bound(frame_dimension, scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_compute_bound_binding() {
        assert_eq!(compute_bound(400.0, 1.0), 0.0);
        assert_eq!(compute_bound(400.0, 2.0), 200.0);
    }
}
