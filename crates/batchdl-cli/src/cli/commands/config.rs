//! `batchdl config` – print config path and effective values.

use anyhow::Result;
use batchdl_core::config::{self, BatchdlConfig};

pub fn show_config(cfg: &BatchdlConfig) -> Result<()> {
    let path = config::config_path()?;
    println!("config: {}", path.display());
    println!("threads: {}", cfg.threads.get());
    println!("strict_playlist: {}", cfg.strict_playlist);
    println!("offset: {}", cfg.offset);
    println!("overwrite: {}", cfg.overwrite);
    match &cfg.download_dir {
        Some(dir) => println!("download_dir: {}", dir.display()),
        None => println!("download_dir: (current directory)"),
    }
    let retry = cfg.retry.clone().unwrap_or_default();
    println!(
        "retry: {} attempts, base {}s, max {}s",
        retry.max_attempts, retry.base_delay_secs, retry.max_delay_secs
    );
    Ok(())
}
