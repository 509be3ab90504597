//! Logging setup for applications embedding the downloader.

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use hycom_common::{HycomError, HycomResult};

/// Subscriber settings, passed explicitly at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default level directive, e.g. "info" or "hycom_downloader=debug"
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human readable output
    #[serde(default)]
    pub json: bool,
    /// Dependency targets clamped to `warn`
    #[serde(default = "default_quiet_targets")]
    pub quiet_targets: Vec<String>,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_quiet_targets() -> Vec<String> {
    ["hyper", "reqwest", "h2", "rustls"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            quiet_targets: default_quiet_targets(),
        }
    }
}

impl LogConfig {
    /// The filter directive string for this config.
    pub fn directives(&self) -> String {
        let mut directives = vec![self.level.clone()];
        directives.extend(self.quiet_targets.iter().map(|t| format!("{}=warn", t)));
        directives.join(",")
    }
}

/// Install the global tracing subscriber.
///
/// Fails if the level is not a valid filter or a subscriber is already set.
pub fn init_tracing(config: &LogConfig) -> HycomResult<()> {
    let filter = EnvFilter::try_new(config.directives())
        .map_err(|e| HycomError::Config(format!("Invalid log filter: {}", e)))?;

    let result = if config.json {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
    } else {
        fmt().with_env_filter(filter).with_target(true).try_init()
    };

    result.map_err(|e| HycomError::Config(format!("Failed to install subscriber: {}", e)))
}
