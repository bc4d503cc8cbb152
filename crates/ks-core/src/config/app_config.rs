//! Application configuration domain model

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Application configuration
///
/// Every section falls back to its defaults when missing from the file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Alignment store connection
    pub store: StoreConfig,

    /// Editor behaviour
    pub editor: EditorConfig,

    /// Log output
    pub logging: LoggingConfig,
}

/// Alignment store connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the store; the API lives under `{base_url}/api`.
    pub base_url: String,

    /// Per-request timeout. `None` leaves requests unbounded; the session
    /// reports them as pending instead.
    pub request_timeout_secs: Option<u64>,
}

impl StoreConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8001".to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Editor behaviour settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Delay between status polls while waiting for processing.
    pub poll_interval_ms: u64,

    /// Polls before giving up on a project that is still processing.
    pub poll_max_attempts: u32,
}

impl EditorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2_000,
            poll_max_attempts: 10,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs to a file under the platform data directory.
    pub file_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { file_logging: true }
    }
}
