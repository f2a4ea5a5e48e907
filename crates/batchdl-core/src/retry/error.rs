//! Transfer error type for retry classification.

/// Error returned by a single track transfer attempt.
/// Classified for retries before being turned into a `FetchError`.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[source] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Disk write failed (disk full, permission denied). Not retried.
    #[error("storage: {0}")]
    Storage(#[source] std::io::Error),
    /// The batch was cancelled while the transfer was running. Not retried.
    #[error("transfer cancelled")]
    Cancelled,
}
