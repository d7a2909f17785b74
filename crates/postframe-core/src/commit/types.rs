//! Data exchanged with the commit pipeline and the image processor.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::edit::{EditOptions, FilterId};
use crate::viewport::CropRegion;

/// Error types for commit operations.
#[derive(Debug, Error)]
pub enum CommitError {
    /// There is no image to edit. Re-select an image; not retried.
    #[error("No source image to commit")]
    InvalidSource,

    /// The image processor failed. Retrying is up to the caller.
    #[error("Image processing failed: {0}")]
    ProcessingFailed(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// The processor finished without producing an image reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Processor returned an empty image reference")]
pub struct MissingResultRef;

/// Reference to the image being edited (object URL, upload key, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceImageRef(String);

impl SourceImageRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the reference cannot point at anything.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for SourceImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceImageRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SourceImageRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Snapshot of the editor taken when the user confirms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    /// Image to process, if one is selected.
    pub source: Option<SourceImageRef>,
    /// Rotation, flips and filter.
    pub edit_options: EditOptions,
    /// Visible viewport, when the processor should crop to it.
    pub crop: Option<CropRegion>,
}

impl CommitRequest {
    pub fn new(source: Option<SourceImageRef>, edit_options: EditOptions) -> Self {
        Self {
            source,
            edit_options,
            crop: None,
        }
    }

    pub fn with_crop(mut self, crop: CropRegion) -> Self {
        self.crop = Some(crop);
        self
    }
}

/// Geometry the image processor is asked to bake in.
///
/// The filter is not part of the job. It is a render-time style and goes
/// straight to the [`CommitResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingJob {
    pub source: SourceImageRef,
    /// Clockwise rotation in `0..360`.
    #[serde(deserialize_with = "crate::edit::deserialize_rotation")]
    pub rotation_degrees: u16,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    /// Normalized crop, applied after rotation and flips.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropRegion>,
}

impl ProcessingJob {
    /// True if the processor has nothing to change.
    pub fn is_identity(&self) -> bool {
        self.rotation_degrees == 0
            && !self.flip_horizontal
            && !self.flip_vertical
            && self.crop.map_or(true, |c| c.is_full())
    }
}

/// Output of the image processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedImage {
    /// Resolvable reference to the new image.
    pub result_ref: String,
}

impl ProcessedImage {
    pub fn new(result_ref: impl Into<String>) -> Self {
        Self {
            result_ref: result_ref.into(),
        }
    }
}

/// Final outcome of a successful commit, ready to attach to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResult {
    pub result_ref: String,
    #[serde(rename = "filterId")]
    pub applied_filter: Option<FilterId>,
}

/// Identifier of one `commit` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommitId(pub u64);

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a commit is in its lifecycle.
///
/// Observers see a commit from `Validating` on; before that there is no
/// commit to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum CommitPhase {
    Validating,
    /// Stages are numbered from 1.
    Processing { stage: u32 },
    Succeeded,
    Failed,
}

impl CommitPhase {
    /// True for `Succeeded` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, CommitPhase::Succeeded | CommitPhase::Failed)
    }
}
