//! Batch result and batch-level errors.

use crate::fetch::FetchError;

/// Terminal phase of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPhase {
    /// Only seen while the batch is still being aggregated.
    Running,
    /// Every job reached a terminal state and no fail-fast trigger occurred.
    #[default]
    Completed,
    /// Fail-fast triggered; in-flight jobs drained, remaining jobs skipped.
    FailedFast,
    /// The cancel flag was set from outside; remaining jobs skipped.
    Cancelled,
}

/// A failed job together with its sequence index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub index: usize,
    pub error: FetchError,
}

/// Aggregated counts of one batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchResult {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Jobs never dispatched because the batch was cancelled.
    pub skipped: usize,
    /// Failed jobs ordered by sequence index.
    pub errors: Vec<JobFailure>,
    pub phase: BatchPhase,
}

impl BatchResult {
    /// Jobs that reached a terminal state.
    pub fn completed(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Batch-level failure. Each variant carries the counts gathered before the
/// batch stopped.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// Strict mode: the first job failure, surfaced after in-flight jobs drained.
    #[error("aborting batch after failure of {error}")]
    FailFast {
        index: usize,
        error: FetchError,
        result: BatchResult,
    },
    #[error("batch cancelled ({} of {} jobs not started)", .result.skipped, .result.total)]
    Cancelled { result: BatchResult },
    #[error("worker thread panicked: {message}")]
    WorkerPanicked { message: String, result: BatchResult },
}

impl BatchError {
    pub fn result(&self) -> &BatchResult {
        match self {
            BatchError::FailFast { result, .. }
            | BatchError::Cancelled { result }
            | BatchError::WorkerPanicked { result, .. } => result,
        }
    }

    /// The job error that triggered a fail-fast abort, if any.
    pub fn trigger(&self) -> Option<&FetchError> {
        match self {
            BatchError::FailFast { error, .. } => Some(error),
            _ => None,
        }
    }
}
