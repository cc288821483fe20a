use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Feed endpoint used when no `base_url` is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.nasa.gov/planetary/apod";

/// Public demo key; heavily rate limited by the server.
pub const DEMO_API_KEY: &str = "DEMO_KEY";

fn default_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Client configuration. Fixed for the lifetime of one client.
///
/// Built in code with [`SdkConfig::new`] or read from `config.toml`; only
/// `api_key` is required in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Sent as the `api_key` query parameter on every request.
    pub api_key: String,
    /// Retries after the first attempt.
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Fixed pause between attempts, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Feed endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl SdkConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            base_url: default_base_url(),
        }
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_retry_delay_ms(mut self, retry_delay_ms: u64) -> Self {
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, Duration::from_millis(self.retry_delay_ms))
    }
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self::new(DEMO_API_KEY)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("apod")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SdkConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SdkConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<SdkConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: SdkConfig = toml::from_str(&data)?;
    Ok(cfg)
}
