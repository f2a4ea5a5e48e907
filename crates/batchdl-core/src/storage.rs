//! Track file lifecycle: write to `.part`, then atomic rename.

use anyhow::{Context, Result};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.mp3` → `a.mp3.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Creates (truncating) the temp file at `temp_path`.
pub fn create_temp(temp_path: &Path) -> io::Result<File> {
    File::create(temp_path)
}

/// Syncs and atomically renames the temp file to `final_path`.
pub fn finalize(file: File, temp_path: &Path, final_path: &Path) -> Result<()> {
    file.sync_all()
        .with_context(|| format!("sync {}", temp_path.display()))?;
    drop(file);
    std::fs::rename(temp_path, final_path).with_context(|| {
        format!(
            "failed to rename {} to {}",
            temp_path.display(),
            final_path.display()
        )
    })?;
    Ok(())
}

/// Removes a partial temp file. Missing files are fine.
pub fn discard(temp_path: &Path) {
    match std::fs::remove_file(temp_path) {
        Ok(()) => tracing::debug!(path = %temp_path.display(), "removed partial file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %temp_path.display(), "could not remove partial file: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("track.mp3"));
        assert_eq!(p.to_string_lossy(), "track.mp3.part");
        let p2 = temp_path(Path::new("/tmp/01 - a.opus"));
        assert_eq!(p2.to_string_lossy(), "/tmp/01 - a.opus.part");
    }

    #[test]
    fn create_write_finalize() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("out.mp3");
        let tp = temp_path(&final_path);
        let mut file = create_temp(&tp).unwrap();
        file.write_all(b"hello").unwrap();
        finalize(file, &tp, &final_path).unwrap();
        assert!(!tp.exists());
        assert_eq!(std::fs::read(&final_path).unwrap(), b"hello");
    }

    #[test]
    fn discard_removes_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("x.mp3");
        let tp = temp_path(&final_path);
        let _file = create_temp(&tp).unwrap();
        assert!(tp.exists());
        discard(&tp);
        assert!(!tp.exists());
        discard(&tp);
    }
}
