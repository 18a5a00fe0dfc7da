//! Runner configuration
//!
//! This module provides the file-backed settings for verification runs:
//! where screenshots land, how the browser is launched, the default wait
//! bound, and the server readiness retry policy.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Result;

/// Runner configuration
///
/// Loaded from `witness.toml` in the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Directory screenshot artifacts are written into
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Default bound for waits that carry no explicit timeout, in seconds
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    /// Browser launch settings
    #[serde(default)]
    pub browser: BrowserSettings,

    /// Server readiness polling
    #[serde(default)]
    pub readiness: RetryPolicy,
}

/// Browser launch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserSettings {
    /// Run without a visible window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Browser window width
    #[serde(default = "default_window_width")]
    pub window_width: u32,

    /// Browser window height
    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// User agent override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Bounded retry policy for the server readiness probe
///
/// The probe makes up to `attempts` HTTP requests, each bounded by
/// `attempt_timeout_ms`, sleeping `interval_ms` between attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum connection attempts
    #[serde(default = "default_probe_attempts")]
    pub attempts: u32,

    /// Fixed sleep between attempts, in milliseconds
    #[serde(default = "default_probe_interval_ms")]
    pub interval_ms: u64,

    /// Per-attempt timeout, in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub attempt_timeout_ms: u64,
}

impl RetryPolicy {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    /// Upper bound on total probe wall time
    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(
            u64::from(self.attempts) * (self.interval_ms + self.attempt_timeout_ms),
        )
    }
}

// Default value providers
fn default_output_dir() -> PathBuf {
    PathBuf::from("verification")
}

fn default_wait_timeout_secs() -> u64 {
    30
}

fn default_headless() -> bool {
    true
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_probe_attempts() -> u32 {
    30
}

fn default_probe_interval_ms() -> u64 {
    1000
}

fn default_probe_timeout_ms() -> u64 {
    2000
}

impl RunnerConfig {
    /// Load configuration from `witness.toml` or use defaults
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let config_path = dir.join("witness.toml");

        if config_path.exists() {
            tracing::debug!("Loading configuration from {:?}", config_path);
            let content = std::fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&content).map_err(|e| {
                crate::WitnessError::Config(format!("Failed to parse config file: {}", e))
            })?)
        } else {
            Ok(Self::default())
        }
    }

    /// Write default configuration to `witness.toml`
    pub fn write_default(dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;

        let config_path = dir.join("witness.toml");
        let config = Self::default();
        let content = toml::to_string_pretty(&config).map_err(|e| {
            crate::WitnessError::Config(format!("Failed to serialize config: {}", e))
        })?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Default wait bound as a duration
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            wait_timeout_secs: default_wait_timeout_secs(),
            browser: BrowserSettings::default(),
            readiness: RetryPolicy::default(),
        }
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            user_agent: None,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: default_probe_attempts(),
            interval_ms: default_probe_interval_ms(),
            attempt_timeout_ms: default_probe_timeout_ms(),
        }
    }
}
