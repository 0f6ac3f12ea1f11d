//! Engine configuration.

use std::io;
use std::path::PathBuf;

pub const ENV_DATA_DIR: &str = "QUESTLOG_DATA_DIR";
pub const ENV_CONTENT_URL: &str = "QUESTLOG_CONTENT_URL";
pub const ENV_CONTENT_KEY: &str = "QUESTLOG_CONTENT_KEY";

/// Directory name under the home directory used when no data dir is set.
pub const DEFAULT_DATA_DIR_NAME: &str = ".questlog";

/// Configuration for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Where the JSON store keeps its files (None = ~/.questlog)
    pub data_dir: Option<PathBuf>,

    /// Endpoint of the HTTP content generator (None = fallback only)
    pub content_url: Option<String>,

    /// Bearer token sent to the content endpoint
    pub content_key: Option<String>,

    /// Request timeout for the content endpoint
    pub content_timeout_secs: u64,

    /// Random seed for reproducible runs (None = entropy)
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            content_url: None,
            content_key: None,
            content_timeout_secs: 20,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `QUESTLOG_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an injectable variable source.
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            data_dir: get(ENV_DATA_DIR).map(PathBuf::from),
            content_url: get(ENV_CONTENT_URL),
            content_key: get(ENV_CONTENT_KEY),
            ..Default::default()
        }
    }

    /// Config for tests: fixed seed, no network.
    pub fn offline(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn has_content_endpoint(&self) -> bool {
        self.content_url.is_some()
    }

    /// The configured data directory, or `~/.questlog`.
    pub fn resolve_data_dir(&self) -> io::Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let home_dir = dirs::home_dir().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine home directory",
            )
        })?;
        Ok(home_dir.join(DEFAULT_DATA_DIR_NAME))
    }
}
