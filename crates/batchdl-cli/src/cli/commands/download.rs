//! `batchdl download` – download a playlist with the worker pool.

use anyhow::{Context, Result};
use batchdl_core::config::{parse_concurrency, BatchdlConfig};
use batchdl_core::control::CancelFlag;
use batchdl_core::download::HttpFetcher;
use batchdl_core::playlist::{self, RunSettings};
use batchdl_core::progress::LogProgress;
use batchdl_core::retry::RetryPolicy;
use batchdl_core::scheduler::BatchResult;
use std::path::PathBuf;

use crate::cli::progress::ConsoleProgress;
use crate::cli::DownloadArgs;

/// Merges config values with CLI flags (flags win).
pub(crate) fn settings_from(cfg: &BatchdlConfig, args: &DownloadArgs) -> RunSettings {
    let mut settings = RunSettings::from(cfg);
    if let Some(raw) = args.threads.as_deref() {
        settings.threads = parse_concurrency(raw);
    }
    if args.strict {
        settings.strict = true;
    }
    if let Some(offset) = args.offset {
        settings.offset = offset;
    }
    settings
}

fn output_dir(cfg: &BatchdlConfig, args: &DownloadArgs) -> Result<PathBuf> {
    match args.output.as_ref().or(cfg.download_dir.as_ref()) {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().context("current directory"),
    }
}

/// Cancel flags of one download run.
///
/// `batch` stops dispatch and is also set by strict mode. `transfers` aborts
/// in-flight downloads and is only set on Ctrl-C, so a strict abort lets
/// running tracks finish.
#[derive(Debug, Clone, Default)]
pub(crate) struct Interrupt {
    pub(crate) batch: CancelFlag,
    pub(crate) transfers: CancelFlag,
}

impl Interrupt {
    pub(crate) fn trigger(&self) {
        self.batch.cancel();
        self.transfers.cancel();
    }
}

pub async fn run_download(cfg: &BatchdlConfig, args: DownloadArgs) -> Result<()> {
    let playlist = playlist::load_playlist(&args.manifest)?;
    let settings = settings_from(cfg, &args);
    let dir = output_dir(cfg, &args)?;
    let policy = cfg
        .retry
        .as_ref()
        .map(RetryPolicy::from)
        .unwrap_or_default();

    let interrupt = Interrupt::default();
    let fetcher = HttpFetcher::new(&dir)
        .overwrite(args.overwrite || cfg.overwrite)
        .retry_policy(policy)
        .cancel_flag(interrupt.transfers.clone());

    let ctrl_c = {
        let interrupt = interrupt.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\ninterrupted, cancelling remaining tracks…");
                interrupt.trigger();
            }
        })
    };

    println!(
        "Downloading {} tracks from \"{}\" into {} ({} threads{})",
        playlist.tracks.len(),
        playlist.title,
        dir.display(),
        settings.threads,
        if settings.strict { ", strict" } else { "" }
    );

    let quiet = args.quiet;
    let cancel = interrupt.batch;
    let outcome = tokio::task::spawn_blocking(move || {
        if quiet {
            playlist::run_playlist(&playlist, &settings, &fetcher, &mut LogProgress, cancel)
        } else {
            let mut progress = ConsoleProgress::new(std::io::stderr());
            playlist::run_playlist(&playlist, &settings, &fetcher, &mut progress, cancel)
        }
    })
    .await
    .context("download task join")?;
    ctrl_c.abort();

    match outcome {
        Ok(result) => {
            print_summary(&result);
            Ok(())
        }
        Err(e) => {
            print_summary(e.result());
            Err(e.into())
        }
    }
}

fn print_summary(result: &BatchResult) {
    println!(
        "Download complete: {} successful, {} failed",
        result.succeeded, result.failed
    );
    if result.skipped > 0 {
        println!("{} track(s) not started", result.skipped);
    }
    for failure in &result.errors {
        println!("  failed: {}", failure.error);
    }
}
