//! CLI for batchdl.

mod commands;
mod progress;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use batchdl_core::config;
use std::path::PathBuf;

use commands::{run_download, show_config};

/// Top-level CLI for batchdl.
#[derive(Debug, Parser)]
#[command(name = "batchdl")]
#[command(about = "batchdl: parallel playlist downloader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every track of a playlist manifest.
    Download(DownloadArgs),

    /// Show the config file path and the effective settings.
    Config,
}

#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Playlist manifest (JSON) with resolved track URLs.
    pub manifest: PathBuf,

    /// Tracks downloaded concurrently. Non-integer or < 1 values mean 1. Overrides config.
    #[arg(long, short = 't', value_name = "N", allow_hyphen_values = true)]
    pub threads: Option<String>,

    /// Abort the whole playlist on the first failed track.
    #[arg(long)]
    pub strict: bool,

    /// Track number of the first track (default from config, normally 1).
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub offset: Option<i64>,

    /// Output directory (default from config, else the current directory).
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Re-download tracks whose file already exists.
    #[arg(long)]
    pub overwrite: bool,

    /// No progress line; progress goes to the log file instead.
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Download(args) => run_download(&cfg, args).await?,
            CliCommand::Config => show_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
