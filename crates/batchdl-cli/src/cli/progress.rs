//! Console progress line: `completed/total  ✅ ok  ❌ failed`.

use anyhow::Result;
use batchdl_core::progress::{ProgressSink, ProgressUpdate};
use std::io::Write;

pub struct ConsoleProgress<W: Write> {
    out: W,
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressSink for ConsoleProgress<W> {
    fn on_progress(&mut self, update: &ProgressUpdate) -> Result<()> {
        write!(
            self.out,
            "\rDownloading tracks {}/{} ({:.0}%)  ✅ {}  ❌ {}",
            update.completed,
            update.total,
            update.fraction() * 100.0,
            update.succeeded,
            update.failed
        )?;
        if update.remaining() == 0 {
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(())
    }
}
