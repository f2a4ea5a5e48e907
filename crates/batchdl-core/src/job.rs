//! Job model: one immutable unit of work plus its position in the batch.

/// One unit of work submitted to the scheduler.
///
/// `payload` is opaque to the scheduler and only read by the fetch capability.
/// `index` is the job's stable position in the input list; it orders error
/// reporting, not execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job<P> {
    pub index: usize,
    pub payload: P,
}

impl<P> Job<P> {
    pub fn new(index: usize, payload: P) -> Self {
        Self { index, payload }
    }
}

/// Builds jobs from payloads, assigning sequence indices in input order.
pub fn jobs_from<P, I>(payloads: I) -> Vec<Job<P>>
where
    I: IntoIterator<Item = P>,
{
    payloads
        .into_iter()
        .enumerate()
        .map(|(index, payload)| Job::new(index, payload))
        .collect()
}

/// Lifecycle of a single job inside one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}
