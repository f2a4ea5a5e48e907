use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

/// Normalizes a raw concurrency value: anything below 1 becomes 1.
pub fn normalize_concurrency(raw: i64) -> usize {
    if raw < 1 {
        1
    } else {
        usize::try_from(raw).unwrap_or(usize::MAX)
    }
}

/// Parses a concurrency value leniently (CLI input): non-integers become 1.
pub fn parse_concurrency(raw: &str) -> usize {
    match raw.trim().parse::<i64>() {
        Ok(n) => normalize_concurrency(n),
        Err(_) => {
            tracing::warn!(value = raw, "non-integer thread count, using 1");
            1
        }
    }
}

/// Worker thread count. Deserializes from any value: integers are clamped to
/// at least 1, anything else (string, float, table) falls back to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threads(usize);

impl Threads {
    pub fn new(raw: i64) -> Self {
        Threads(normalize_concurrency(raw))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for Threads {
    fn default() -> Self {
        Threads(1)
    }
}

impl Serialize for Threads {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0 as u64)
    }
}

impl<'de> Deserialize<'de> for Threads {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Other(serde::de::IgnoredAny),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Threads::new(n),
            Raw::Other(_) => {
                tracing::warn!("non-integer `threads` in config, using 1");
                Threads(1)
            }
        })
    }
}

/// Retry policy for the HTTP track fetcher (optional section in config.toml).
/// The scheduler itself never retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per track (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/batchdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchdlConfig {
    /// Number of tracks downloaded concurrently.
    #[serde(default)]
    pub threads: Threads,
    /// Abort the whole playlist on the first failed track.
    #[serde(default)]
    pub strict_playlist: bool,
    /// Track number given to the first track of a playlist.
    #[serde(default = "default_offset")]
    pub offset: i64,
    /// Re-download tracks whose file already exists.
    #[serde(default)]
    pub overwrite: bool,
    /// Output directory (None = current directory).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

fn default_offset() -> i64 {
    1
}

impl Default for BatchdlConfig {
    fn default() -> Self {
        Self {
            threads: Threads::default(),
            strict_playlist: false,
            offset: default_offset(),
            overwrite: false,
            download_dir: None,
            retry: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("batchdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BatchdlConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Like `load_or_init` for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<BatchdlConfig> {
    if !path.exists() {
        let default_cfg = BatchdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: BatchdlConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
