//! Batch cancellation: a shared, one-way flag.
//!
//! The scheduler sets the flag on the first failure in fail-fast mode; the CLI
//! sets it on Ctrl-C. Workers poll it before taking the next job. A fetch
//! implementation that aborts in-flight transfers should poll its own flag,
//! set only on user interrupt, so that strict mode still drains.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle to a one-way cancellation flag. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag. Returns true if this call flipped it (false→true).
    pub fn cancel(&self) -> bool {
        !self.flag.swap(true, Ordering::AcqRel)
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
