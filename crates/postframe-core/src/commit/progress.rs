//! Per-commit progress reporting.

use super::types::{CommitId, CommitPhase};
use super::CommitObserver;

/// Progress stream owned by a single commit.
///
/// Values are percentages. The stream never goes backwards: values lower
/// than the last emitted one are dropped, values above 100 become 100, and
/// repeats are not re-emitted. Once the commit reaches its outcome the
/// reporter is closed and further reports are ignored.
pub struct ProgressReporter<'a> {
    id: CommitId,
    sink: &'a mut dyn FnMut(u8),
    observer: &'a dyn CommitObserver,
    last: Option<u8>,
    stage: u32,
    closed: bool,
}

impl<'a> ProgressReporter<'a> {
    pub(crate) fn new(
        id: CommitId,
        sink: &'a mut dyn FnMut(u8),
        observer: &'a dyn CommitObserver,
    ) -> Self {
        Self {
            id,
            sink,
            observer,
            last: None,
            stage: 0,
            closed: false,
        }
    }

    /// Commit this reporter belongs to.
    pub fn id(&self) -> CommitId {
        self.id
    }

    /// Last emitted value.
    pub fn last(&self) -> Option<u8> {
        self.last
    }

    /// Current processing stage, 0 before the first one begins.
    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Report overall progress as a percentage.
    pub fn report(&mut self, percent: u8) {
        if self.closed {
            return;
        }
        let percent = percent.min(100);
        if self.last.is_some_and(|last| percent <= last) {
            return;
        }
        self.last = Some(percent);
        (self.sink)(percent);
    }

    /// Start the next processing stage and return its number.
    pub fn begin_stage(&mut self) -> u32 {
        if self.closed {
            return self.stage;
        }
        self.stage = self.stage.saturating_add(1);
        self.observer.phase_changed(
            self.id,
            CommitPhase::Processing { stage: self.stage },
        );
        self.stage
    }

    /// Emit the final 100 if it was not reported yet, then close.
    pub(crate) fn complete(&mut self) {
        self.report(100);
        self.close();
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
    }
}

impl std::fmt::Debug for ProgressReporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("id", &self.id)
            .field("last", &self.last)
            .field("stage", &self.stage)
            .field("closed", &self.closed)
            .finish()
    }
}
