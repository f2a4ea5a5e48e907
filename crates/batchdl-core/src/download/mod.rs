//! HTTP track fetcher: the fetch capability used by the CLI.
//!
//! Downloads one track per call with libcurl into `<name>.part`, renames it on
//! success and removes it on failure. Retries transient failures internally
//! and aborts an in-flight transfer once the shared cancel flag is set.

mod transfer;

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::control::CancelFlag;
use crate::fetch::{Fetch, FetchError};
use crate::job::Job;
use crate::playlist::TrackJob;
use crate::retry::{run_with_retry, RetryPolicy, TransferError};
use crate::storage;
use crate::url_model;

pub use transfer::TransferOptions;

/// What happened to a track that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackStatus {
    Downloaded { path: PathBuf, bytes: u64 },
    /// Final file already present and overwrite disabled.
    Skipped { path: PathBuf },
}

/// Fetch capability that downloads playlist tracks over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    output_dir: PathBuf,
    overwrite: bool,
    retry: RetryPolicy,
    cancel: CancelFlag,
    transfer: TransferOptions,
}

impl HttpFetcher {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            overwrite: false,
            retry: RetryPolicy::default(),
            cancel: CancelFlag::new(),
            transfer: TransferOptions::default(),
        }
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Flag that aborts in-flight transfers. Pass a user-interrupt flag, not the
    /// batch flag: strict mode sets the latter and running tracks must finish.
    pub fn cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn transfer_options(mut self, opts: TransferOptions) -> Self {
        self.transfer = opts;
        self
    }

    /// Final path of a track inside the output directory.
    pub fn track_path(&self, job: &TrackJob) -> PathBuf {
        let name = url_model::track_filename(
            &job.playlist.tracknumber,
            &job.track.title,
            &job.track.url,
        );
        self.output_dir.join(name)
    }

    /// Downloads one track.
    pub fn download(&self, job: &TrackJob) -> Result<TrackStatus> {
        let final_path = self.track_path(job);
        if final_path.exists() && !self.overwrite {
            tracing::info!(path = %final_path.display(), "track already downloaded, skipping");
            return Ok(TrackStatus::Skipped { path: final_path });
        }
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("create output dir {}", self.output_dir.display()))?;

        let temp_path = storage::temp_path(&final_path);
        let attempt = run_with_retry(&self.retry, &self.cancel, || {
            let mut file = storage::create_temp(&temp_path).map_err(TransferError::Storage)?;
            let bytes = transfer::get_to_writer(&job.track.url, &mut file, &self.cancel, &self.transfer)?;
            Ok((file, bytes))
        });

        let (file, bytes) = match attempt {
            Ok(done) => done,
            Err(e) => {
                storage::discard(&temp_path);
                return Err(anyhow::Error::new(e)).with_context(|| format!("GET {}", job.track.url));
            }
        };
        if let Err(e) = storage::finalize(file, &temp_path, &final_path) {
            storage::discard(&temp_path);
            return Err(e);
        }
        tracing::debug!(path = %final_path.display(), bytes, "track downloaded");
        Ok(TrackStatus::Downloaded {
            path: final_path,
            bytes,
        })
    }
}

impl Fetch<TrackJob> for HttpFetcher {
    fn fetch(&self, job: &Job<TrackJob>) -> Result<(), FetchError> {
        self.download(&job.payload)
            .map(|_| ())
            .map_err(|e| FetchError::from_anyhow(job.payload.label(), &e))
    }
}
