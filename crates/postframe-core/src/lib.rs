//! Postframe Core - Interactive image transform engine
//!
//! This crate provides the editing core behind the post-media editor of the
//! Postframe client: pinch and pan gestures over a clamped viewport,
//! quarter-turn rotation, flips and style filters, and the asynchronous
//! commit pipeline that hands the final transform to an image processor.
//!
//! No pixels are touched here. The crate computes *what* transform to apply
//! and leaves rasterizing it to the [`commit::ImageProcessor`].
//!
//! # Data Flow
//!
//! ```text
//! PointerEvent ─▶ GestureSession ─▶ ViewportModel ─┐
//!                                                   ├─▶ RenderTransform (preview)
//!                 EditOptions ──────────────────────┘
//!                      │
//!                      └─▶ CommitRequest ─▶ CommitPipeline ─▶ ImageProcessor
//! ```

pub mod commit;
pub mod config;
pub mod edit;
pub mod editor;
pub mod gesture;
pub mod render;
pub mod viewport;

pub use commit::{
    CommitError, CommitObserver, CommitPipeline, CommitRequest, CommitResult, ImageProcessor,
    ProcessedImage, ProcessingJob, ProgressReporter, SourceImageRef,
};
pub use config::{ConfigError, EditorConfig, FrameSize, MAX_SCALE, MIN_SCALE};
pub use edit::{EditOptions, FilterId, FlipAxis, UnknownFilter};
pub use editor::{EditorSession, EditorSnapshot};
pub use gesture::{GestureInputError, GestureSession, Phase, Point, PointerEvent};
pub use render::{RenderTransform, TransformOp};
pub use viewport::{compute_bound, CropRegion, ViewportModel, ViewportTransform};
