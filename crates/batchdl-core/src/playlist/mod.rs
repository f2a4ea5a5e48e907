//! Playlist batch runner.
//!
//! Reads an already-resolved playlist manifest, turns each track into a job
//! carrying its own copy of the playlist numbering info, and hands the jobs to
//! the scheduler.

mod jobs;
mod runner;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use jobs::{build_jobs, PlaylistInfo, TrackJob};
pub use runner::{run_playlist, RunSettings};

/// A playlist whose tracks are already resolved to downloadable stream URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: u64,
    pub title: String,
    pub author: String,
    /// Track count as reported by the source; defaults to `tracks.len()`.
    #[serde(default)]
    pub track_count: Option<usize>,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: u64,
    pub title: String,
    /// Direct stream URL.
    pub url: String,
    #[serde(default)]
    pub artist: Option<String>,
}

impl Playlist {
    pub fn track_total(&self) -> usize {
        self.track_count.unwrap_or(self.tracks.len())
    }
}

/// Parses a playlist manifest from JSON text.
pub fn parse_playlist(json: &str) -> Result<Playlist> {
    let playlist: Playlist = serde_json::from_str(json).context("invalid playlist manifest")?;
    Ok(playlist)
}

/// Reads a playlist manifest (JSON) from disk.
pub fn load_playlist(path: &Path) -> Result<Playlist> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("read playlist manifest {}", path.display()))?;
    parse_playlist(&data).with_context(|| format!("parse {}", path.display()))
}
