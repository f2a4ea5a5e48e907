//! Building scheduler jobs from a playlist.

use crate::job::Job;

use super::{Playlist, Track};

/// Per-track copy of the playlist metadata used for numbering and tagging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistInfo {
    pub author: String,
    pub id: u64,
    pub title: String,
    pub tracknumber_int: i64,
    /// `tracknumber_int` zero-padded to two digits.
    pub tracknumber: String,
    pub tracknumber_total: usize,
}

/// Payload of one playlist download job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackJob {
    pub track: Track,
    pub playlist: PlaylistInfo,
}

impl TrackJob {
    /// Identifier used in logs and error reports: `"03 Title (track id)"`.
    pub fn label(&self) -> String {
        format!(
            "{} {} ({})",
            self.playlist.tracknumber, self.track.title, self.track.id
        )
    }
}

/// One job per track in playlist order. Track numbers start at `offset`;
/// sequence indices start at 0.
pub fn build_jobs(playlist: &Playlist, offset: i64) -> Vec<Job<TrackJob>> {
    let total = playlist.track_total();
    playlist
        .tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let number = offset.saturating_add(i as i64);
            let info = PlaylistInfo {
                author: playlist.author.clone(),
                id: playlist.id,
                title: playlist.title.clone(),
                tracknumber_int: number,
                tracknumber: format!("{:02}", number),
                tracknumber_total: total,
            };
            Job::new(
                i,
                TrackJob {
                    track: track.clone(),
                    playlist: info,
                },
            )
        })
        .collect()
}
