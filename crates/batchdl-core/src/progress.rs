//! Progress reporting for a batch (jobs done, successes, failures).
//!
//! The scheduler calls the sink from a single aggregating thread, one call per
//! recorded outcome, so sinks need no internal synchronization.

use anyhow::Result;

/// Snapshot of batch progress after an outcome has been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Jobs that reached a terminal state so far.
    pub completed: usize,
    /// Jobs in the batch.
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl ProgressUpdate {
    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed as f64 / self.total as f64).min(1.0)
    }

    /// Jobs not yet in a terminal state.
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }
}

/// Receiver of progress updates. Errors are logged by the scheduler and
/// otherwise ignored; a broken progress display never aborts a batch.
pub trait ProgressSink {
    fn on_progress(&mut self, update: &ProgressUpdate) -> Result<()>;
}

impl<F> ProgressSink for F
where
    F: FnMut(&ProgressUpdate),
{
    fn on_progress(&mut self, update: &ProgressUpdate) -> Result<()> {
        self(update);
        Ok(())
    }
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn on_progress(&mut self, _update: &ProgressUpdate) -> Result<()> {
        Ok(())
    }
}

/// Emits one `tracing` event per update.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn on_progress(&mut self, update: &ProgressUpdate) -> Result<()> {
        tracing::info!(
            completed = update.completed,
            total = update.total,
            succeeded = update.succeeded,
            failed = update.failed,
            "batch progress"
        );
        Ok(())
    }
}
