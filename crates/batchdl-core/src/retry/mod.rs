//! Fetch-level retry and backoff.
//!
//! Used inside the HTTP track fetcher only: the scheduler treats each job's
//! outcome as final, so any retrying happens within a single fetch call.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::TransferError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
