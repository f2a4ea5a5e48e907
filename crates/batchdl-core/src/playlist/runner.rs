//! Runs a playlist through the scheduler.

use crate::config::BatchdlConfig;
use crate::control::CancelFlag;
use crate::fetch::Fetch;
use crate::progress::ProgressSink;
use crate::scheduler::{run_batch, BatchError, BatchOptions, BatchResult};

use super::jobs::{build_jobs, TrackJob};
use super::Playlist;

/// Batch-level settings taken from config and CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Worker count (already normalized to >= 1).
    pub threads: usize,
    /// Fail-fast: abort the playlist on the first failed track.
    pub strict: bool,
    /// Track number of the first track.
    pub offset: i64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            threads: 1,
            strict: false,
            offset: 1,
        }
    }
}

impl From<&BatchdlConfig> for RunSettings {
    fn from(cfg: &BatchdlConfig) -> Self {
        Self {
            threads: cfg.threads.get(),
            strict: cfg.strict_playlist,
            offset: cfg.offset,
        }
    }
}

/// Downloads every track of `playlist` with `fetch`.
///
/// `cancel` is shared with the scheduler: it is set on a strict-mode failure
/// and may be set by the caller to stop the playlist.
pub fn run_playlist<F, S>(
    playlist: &Playlist,
    settings: &RunSettings,
    fetch: &F,
    progress: &mut S,
    cancel: CancelFlag,
) -> Result<BatchResult, BatchError>
where
    F: Fetch<TrackJob> + ?Sized,
    S: ProgressSink + ?Sized,
{
    let jobs = build_jobs(playlist, settings.offset);
    tracing::info!(
        playlist = %playlist.title,
        "starting parallel download of {} tracks with {} threads",
        jobs.len(),
        settings.threads
    );

    let options = BatchOptions {
        concurrency: settings.threads.max(1),
        fail_fast: settings.strict,
        cancel,
    };
    let result = run_batch(jobs, &options, fetch, progress)?;
    tracing::info!(
        "download complete: {} successful, {} failed",
        result.succeeded,
        result.failed
    );
    Ok(result)
}
