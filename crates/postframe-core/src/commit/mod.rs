//! Staged, asynchronous commit of an edit.
//!
//! # Lifecycle
//!
//! ```text
//! commit() ─▶ Validating ─▶ Processing(1..N) ─▶ Succeeded
//!                  │                 │
//!                  └─────────────────┴────────▶ Failed
//! ```
//!
//! The pipeline only describes the transform; rasterizing it is the job of
//! an [`ImageProcessor`]. Every call owns its own [`ProgressReporter`], so
//! concurrent commits never share a progress stream. There is no
//! cancellation and no automatic retry.

mod progress;
mod types;

use std::cell::Cell;
use std::future::Future;

pub use progress::ProgressReporter;
pub use types::{
    CommitError, CommitId, CommitPhase, CommitRequest, CommitResult, MissingResultRef,
    ProcessedImage, ProcessingJob, SourceImageRef,
};

/// External collaborator that bakes rotation, flips and crop into a new
/// image.
///
/// Implementations may report progress through `progress` and may suspend
/// at any point. Implementors can write the method as an `async fn`.
pub trait ImageProcessor {
    type Error: std::error::Error + Send + Sync + 'static;

    fn process(
        &self,
        job: &ProcessingJob,
        progress: &mut ProgressReporter<'_>,
    ) -> impl Future<Output = Result<ProcessedImage, Self::Error>>;
}

/// Hooks for UI state around a commit. Every method defaults to a no-op.
pub trait CommitObserver {
    /// The commit entered a new phase.
    fn phase_changed(&self, _id: CommitId, _phase: CommitPhase) {}

    /// Called with `true` once when the commit starts and with `false` once
    /// when it reaches its outcome.
    fn loading_changed(&self, _id: CommitId, _loading: bool) {}
}

impl CommitObserver for () {}

/// Clears the loading flag exactly once, even if the commit future is
/// dropped before it resolves.
struct LoadingGuard<'a> {
    id: CommitId,
    observer: &'a dyn CommitObserver,
}

impl<'a> LoadingGuard<'a> {
    fn new(id: CommitId, observer: &'a dyn CommitObserver) -> Self {
        observer.loading_changed(id, true);
        Self { id, observer }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.observer.loading_changed(self.id, false);
    }
}

/// Runs commits against an [`ImageProcessor`].
#[derive(Debug)]
pub struct CommitPipeline<P, O = ()> {
    processor: P,
    observer: O,
    next_id: Cell<u64>,
}

impl<P: ImageProcessor> CommitPipeline<P> {
    pub fn new(processor: P) -> Self {
        Self::with_observer(processor, ())
    }
}

impl<P: ImageProcessor, O: CommitObserver> CommitPipeline<P, O> {
    pub fn with_observer(processor: P, observer: O) -> Self {
        Self {
            processor,
            observer,
            next_id: Cell::new(1),
        }
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Commit an edit.
    ///
    /// Progress values are passed to `on_progress`. They are non-decreasing,
    /// and the last value before success is 100. Nothing is emitted after a
    /// failure. A missing or empty source fails with
    /// [`CommitError::InvalidSource`] without reaching the processor.
    pub async fn commit(
        &self,
        request: CommitRequest,
        mut on_progress: impl FnMut(u8),
    ) -> Result<CommitResult, CommitError> {
        let id = self.allocate_id();
        let _loading = LoadingGuard::new(id, &self.observer);

        self.observer.phase_changed(id, CommitPhase::Validating);
        let job = match Self::validate(&request) {
            Ok(job) => job,
            Err(err) => {
                tracing::warn!("Commit {id} rejected: {err}");
                self.observer.phase_changed(id, CommitPhase::Failed);
                return Err(err);
            }
        };
        let applied_filter = request.edit_options.filter;
        tracing::debug!("Commit {id} processing {}", job.source);

        let mut reporter = ProgressReporter::new(id, &mut on_progress, &self.observer);
        reporter.begin_stage();
        reporter.report(0);

        let outcome = self
            .processor
            .process(&job, &mut reporter)
            .await
            .map_err(|err| CommitError::ProcessingFailed(Box::new(err)))
            .and_then(|processed| {
                if processed.result_ref.trim().is_empty() {
                    Err(CommitError::ProcessingFailed(Box::new(MissingResultRef)))
                } else {
                    Ok(processed)
                }
            });

        match outcome {
            Ok(processed) => {
                reporter.complete();
                self.observer.phase_changed(id, CommitPhase::Succeeded);
                tracing::info!("Commit {id} succeeded: {}", processed.result_ref);
                Ok(CommitResult {
                    result_ref: processed.result_ref,
                    applied_filter,
                })
            }
            Err(err) => {
                reporter.close();
                self.observer.phase_changed(id, CommitPhase::Failed);
                tracing::warn!("Commit {id} failed: {err}");
                Err(err)
            }
        }
    }

    fn allocate_id(&self) -> CommitId {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        CommitId(id)
    }

    fn validate(request: &CommitRequest) -> Result<ProcessingJob, CommitError> {
        let source = match &request.source {
            Some(source) if !source.is_empty() => source.clone(),
            _ => return Err(CommitError::InvalidSource),
        };
        let edits = &request.edit_options;
        Ok(ProcessingJob {
            source,
            rotation_degrees: edits.rotation_degrees,
            flip_horizontal: edits.flip_horizontal,
            flip_vertical: edits.flip_vertical,
            crop: request.crop,
        })
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
