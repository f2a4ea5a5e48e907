//! Fixed-size worker pool pulling jobs from a shared queue.
//!
//! Workers send `Started`/`Finished` events over one channel; the calling
//! thread drains the channel and is the only writer of `BatchState`. In
//! fail-fast mode a worker whose job failed also sets the cancel flag itself,
//! before it returns to the queue.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::{Mutex, PoisonError};
use std::thread;

use crate::control::CancelFlag;
use crate::fetch::Fetch;
use crate::job::Job;
use crate::progress::ProgressSink;

use super::state::{BatchState, Outcome};

enum Event {
    Started(usize),
    Finished(Outcome),
}

type Queue<P> = Mutex<VecDeque<(usize, Job<P>)>>;

/// Runs `jobs` on `workers` scoped threads. Returns the first worker panic message, if any.
pub(super) fn run_pool<P, F, S>(
    jobs: Vec<Job<P>>,
    workers: usize,
    fetch: &F,
    state: &mut BatchState,
    progress: &mut S,
) -> Option<String>
where
    P: Send,
    F: Fetch<P> + ?Sized,
    S: ProgressSink + ?Sized,
{
    let queue: Queue<P> = Mutex::new(jobs.into_iter().enumerate().collect());
    let cancel = state.cancel_flag().clone();
    let fail_fast = state.fail_fast();
    let (tx, rx) = mpsc::channel();

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for worker in 0..workers {
            let tx = tx.clone();
            let queue = &queue;
            let cancel = &cancel;
            handles.push(scope.spawn(move || {
                worker_loop(worker, queue, cancel, fail_fast, fetch, tx)
            }));
        }
        drop(tx);

        // Ends once every worker has exited and dropped its sender.
        for event in rx {
            match event {
                Event::Started(slot) => state.mark_started(slot),
                Event::Finished(outcome) => state.record(outcome, &mut *progress),
            }
        }

        let mut panicked = None;
        for handle in handles {
            if let Err(payload) = handle.join() {
                let message = super::panic_message(&*payload);
                tracing::error!("worker panicked: {}", message);
                panicked.get_or_insert(message);
            }
        }
        panicked
    })
}

fn worker_loop<P, F>(
    worker: usize,
    queue: &Queue<P>,
    cancel: &CancelFlag,
    fail_fast: bool,
    fetch: &F,
    tx: mpsc::Sender<Event>,
) where
    F: Fetch<P> + ?Sized,
{
    loop {
        let next = {
            let mut q = queue.lock().unwrap_or_else(PoisonError::into_inner);
            if cancel.is_cancelled() {
                break;
            }
            q.pop_front()
        };
        let Some((slot, job)) = next else {
            break;
        };
        tracing::debug!(worker, index = job.index, "job started");
        if tx.send(Event::Started(slot)).is_err() {
            break;
        }
        let result = fetch.fetch(&job);
        // Must be visible before this worker pops again; the aggregator only
        // sees the outcome later.
        if fail_fast && result.is_err() && cancel.cancel() {
            tracing::debug!(worker, index = job.index, "strict mode: dispatch stopped");
        }
        let outcome = Outcome {
            slot,
            index: job.index,
            result,
        };
        if tx.send(Event::Finished(outcome)).is_err() {
            break;
        }
    }
    tracing::trace!(worker, "worker exiting");
}
