//! Track filename derivation.
//!
//! Builds `"NN - Title.ext"` names for downloaded tracks, sanitized for Linux
//! filesystems, with the extension taken from the stream URL.

mod sanitize;

pub use sanitize::sanitize_filename_for_linux;

/// Extension used when the URL path has none.
pub const DEFAULT_EXTENSION: &str = "mp3";

/// Returns the lowercase file extension of the URL's last path segment, if it
/// looks like one (1–5 alphanumeric characters).
pub fn extension_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    let (stem, ext) = last.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > 5 {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Filename for a track: `"{tracknumber} - {title}.{ext}"`, sanitized.
/// Falls back to `"{tracknumber}.{ext}"` when the title sanitizes to nothing.
pub fn track_filename(tracknumber: &str, title: &str, url: &str) -> String {
    let ext = extension_from_url(url).unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    let title = sanitize_filename_for_linux(title);
    let stem = if title.is_empty() {
        tracknumber.to_string()
    } else {
        format!("{} - {}", tracknumber, title)
    };
    sanitize_filename_for_linux(&format!("{}.{}", stem, ext))
}
