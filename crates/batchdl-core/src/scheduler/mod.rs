//! Worker pool scheduler.
//!
//! Runs a batch of jobs through a caller-supplied fetch capability with bounded
//! concurrency: fetch → outcome → aggregator (counters, progress, fail-fast).
//! The aggregator is the only writer of batch state, so progress calls are
//! serialized and `completed == succeeded + failed` holds after every outcome.

mod pool;
mod result;
mod sequential;
mod state;

use crate::config::normalize_concurrency;
use crate::control::CancelFlag;
use crate::fetch::Fetch;
use crate::job::Job;
use crate::progress::ProgressSink;

pub use result::{BatchError, BatchPhase, BatchResult, JobFailure};

use state::BatchState;

/// Knobs for one `run_batch` call.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Worker count; 0 is treated as 1.
    pub concurrency: usize,
    /// Stop dispatching after the first failure and return it as an error.
    pub fail_fast: bool,
    /// Cancellation flag shared with the workers. Set by the scheduler on a
    /// fail-fast trigger; may also be set by the caller (e.g. on Ctrl-C).
    pub cancel: CancelFlag,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            fail_fast: false,
            cancel: CancelFlag::new(),
        }
    }
}

impl BatchOptions {
    /// Options from a raw, possibly non-positive concurrency value.
    pub fn new(concurrency: i64, fail_fast: bool) -> Self {
        Self {
            concurrency: normalize_concurrency(concurrency),
            fail_fast,
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Runs every job through `fetch` with at most `options.concurrency` jobs in flight.
///
/// With concurrency 1 the jobs run on the calling thread in input order. With
/// more, a pool of `min(concurrency, jobs.len())` threads pulls from a shared
/// queue. `progress` is called once per recorded outcome, always from the
/// calling thread.
///
/// Returns `BatchError::FailFast` (after in-flight jobs drain) when
/// `options.fail_fast` is set and a job fails, and `BatchError::Cancelled`
/// when the cancel flag was set from outside before every job ran.
pub fn run_batch<P, F, S>(
    jobs: Vec<Job<P>>,
    options: &BatchOptions,
    fetch: &F,
    progress: &mut S,
) -> Result<BatchResult, BatchError>
where
    P: Send,
    F: Fetch<P> + ?Sized,
    S: ProgressSink + ?Sized,
{
    let total = jobs.len();
    if total == 0 {
        tracing::debug!("empty batch, nothing to run");
        return Ok(BatchResult::default());
    }

    let concurrency = options.concurrency.max(1);
    tracing::info!(
        total,
        concurrency,
        fail_fast = options.fail_fast,
        "starting batch"
    );

    let mut state = BatchState::new(total, options.fail_fast, options.cancel.clone());
    let panicked = if concurrency == 1 {
        sequential::run_sequential(jobs, fetch, &mut state, progress)
    } else {
        pool::run_pool(jobs, concurrency.min(total), fetch, &mut state, progress)
    };

    let outcome = state.finish(panicked);
    match &outcome {
        Ok(result) => tracing::info!(
            succeeded = result.succeeded,
            failed = result.failed,
            "batch complete"
        ),
        Err(e) => tracing::error!(
            succeeded = e.result().succeeded,
            failed = e.result().failed,
            skipped = e.result().skipped,
            "batch stopped: {}",
            e
        ),
    }
    outcome
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
