//! Fetch capability: the caller-supplied operation that performs one job.
//!
//! The scheduler never inspects a `FetchError` beyond its presence; the
//! message and job id exist for logging and for the final report.

use crate::job::Job;

/// Failure of a single job, as reported by the fetch capability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{job_id}: {message}")]
pub struct FetchError {
    /// Human-readable identifier of the failed job (e.g. track number and title).
    pub job_id: String,
    pub message: String,
}

impl FetchError {
    pub fn new(job_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            message: message.into(),
        }
    }

    /// Wraps an `anyhow::Error`, keeping the whole context chain in the message.
    pub fn from_anyhow(job_id: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::new(job_id, format!("{:#}", err))
    }
}

/// Performs one job. May block for as long as the underlying I/O takes.
///
/// Implementations are shared by all worker threads, hence `Sync`. Any
/// client the implementation needs (HTTP handle factory, credentials) lives
/// inside the implementor, never in global state.
pub trait Fetch<P>: Sync {
    fn fetch(&self, job: &Job<P>) -> Result<(), FetchError>;
}

impl<P, F> Fetch<P> for F
where
    F: Fn(&Job<P>) -> Result<(), FetchError> + Sync,
{
    fn fetch(&self, job: &Job<P>) -> Result<(), FetchError> {
        self(job)
    }
}
