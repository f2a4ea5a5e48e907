//! Single-executor path: jobs run on the calling thread in input order.

use std::panic::{self, AssertUnwindSafe};

use crate::fetch::Fetch;
use crate::job::Job;
use crate::progress::ProgressSink;

use super::state::{BatchState, Outcome};

/// Runs `jobs` one after another. Returns the panic message if a fetch panicked;
/// no further jobs are started after a panic.
pub(super) fn run_sequential<P, F, S>(
    jobs: Vec<Job<P>>,
    fetch: &F,
    state: &mut BatchState,
    progress: &mut S,
) -> Option<String>
where
    F: Fetch<P> + ?Sized,
    S: ProgressSink + ?Sized,
{
    for (slot, job) in jobs.into_iter().enumerate() {
        if state.is_cancelled() {
            break;
        }
        state.mark_started(slot);
        tracing::debug!(index = job.index, "job started");
        let result = match panic::catch_unwind(AssertUnwindSafe(|| fetch.fetch(&job))) {
            Ok(result) => result,
            Err(payload) => {
                let message = super::panic_message(&*payload);
                tracing::error!(index = job.index, "fetch panicked: {}", message);
                return Some(message);
            }
        };
        state.record(
            Outcome {
                slot,
                index: job.index,
                result,
            },
            &mut *progress,
        );
    }
    None
}
