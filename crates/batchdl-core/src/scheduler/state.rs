//! Aggregated batch state. Owned by exactly one thread (the aggregator).

use crate::control::CancelFlag;
use crate::fetch::FetchError;
use crate::job::JobState;
use crate::progress::{ProgressSink, ProgressUpdate};

use super::result::{BatchError, BatchPhase, BatchResult, JobFailure};

/// Result of running one job, sent from an executor to the aggregator.
/// `slot` is the job's position in the input list.
#[derive(Debug)]
pub(super) struct Outcome {
    pub(super) slot: usize,
    pub(super) index: usize,
    pub(super) result: Result<(), FetchError>,
}

pub(super) struct BatchState {
    total: usize,
    completed: usize,
    succeeded: usize,
    failed: usize,
    jobs: Vec<JobState>,
    failures: Vec<JobFailure>,
    trigger: Option<JobFailure>,
    fail_fast: bool,
    cancel: CancelFlag,
    phase: BatchPhase,
}

impl BatchState {
    pub(super) fn new(total: usize, fail_fast: bool, cancel: CancelFlag) -> Self {
        Self {
            total,
            completed: 0,
            succeeded: 0,
            failed: 0,
            jobs: vec![JobState::Queued; total],
            failures: Vec::new(),
            trigger: None,
            fail_fast,
            cancel,
            phase: BatchPhase::Running,
        }
    }

    pub(super) fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    pub(super) fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    pub(super) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(super) fn mark_started(&mut self, slot: usize) {
        if let Some(state) = self.jobs.get_mut(slot) {
            if *state == JobState::Queued {
                *state = JobState::Running;
            }
        }
    }

    /// Folds one outcome into the counters, reports progress, and flips the
    /// cancel flag on the first failure in fail-fast mode.
    pub(super) fn record<S>(&mut self, outcome: Outcome, progress: &mut S)
    where
        S: ProgressSink + ?Sized,
    {
        let Outcome {
            slot,
            index,
            result,
        } = outcome;
        let Some(state) = self.jobs.get_mut(slot) else {
            tracing::warn!(slot, "outcome for unknown job slot ignored");
            return;
        };
        if state.is_terminal() {
            tracing::warn!(slot, index, "duplicate outcome ignored");
            return;
        }

        self.completed += 1;
        match result {
            Ok(()) => {
                *state = JobState::Succeeded;
                self.succeeded += 1;
                tracing::debug!(index, "job succeeded");
            }
            Err(error) => {
                *state = JobState::Failed;
                self.failed += 1;
                tracing::error!(
                    index,
                    job_id = %error.job_id,
                    "failed to download: {}",
                    error.message
                );
                let failure = JobFailure { index, error };
                if self.fail_fast && self.trigger.is_none() {
                    self.trigger = Some(failure.clone());
                    self.cancel.cancel();
                    tracing::warn!(index, "strict mode: cancelling remaining jobs");
                }
                self.failures.push(failure);
            }
        }
        debug_assert_eq!(self.completed, self.succeeded + self.failed);
        debug_assert!(self.completed <= self.total);

        let update = self.snapshot();
        if let Err(e) = progress.on_progress(&update) {
            tracing::warn!("progress reporter failed: {:#}", e);
        }
    }

    pub(super) fn snapshot(&self) -> ProgressUpdate {
        ProgressUpdate {
            completed: self.completed,
            total: self.total,
            succeeded: self.succeeded,
            failed: self.failed,
        }
    }

    /// Closes the batch. `panicked` carries the message of a worker panic, if any.
    pub(super) fn finish(mut self, panicked: Option<String>) -> Result<BatchResult, BatchError> {
        let skipped = self
            .jobs
            .iter()
            .filter(|s| **s == JobState::Queued)
            .count();
        self.failures.sort_by_key(|f| f.index);
        self.phase = if self.trigger.is_some() {
            BatchPhase::FailedFast
        } else if skipped > 0 && self.cancel.is_cancelled() {
            BatchPhase::Cancelled
        } else {
            BatchPhase::Completed
        };

        let result = BatchResult {
            total: self.total,
            succeeded: self.succeeded,
            failed: self.failed,
            skipped,
            errors: self.failures,
            phase: self.phase,
        };

        if let Some(message) = panicked {
            return Err(BatchError::WorkerPanicked { message, result });
        }
        match (self.phase, self.trigger) {
            (BatchPhase::FailedFast, Some(JobFailure { index, error })) => {
                Err(BatchError::FailFast {
                    index,
                    error,
                    result,
                })
            }
            (BatchPhase::Cancelled, _) => Err(BatchError::Cancelled { result }),
            _ => Ok(result),
        }
    }
}
