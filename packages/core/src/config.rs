//! Runner configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::priority_queue::Priority;

/// Environment variable overriding [`RunnerConfig::unit_duration_ms`].
pub const ENV_UNIT_DURATION_MS: &str = "PRIOQ_UNIT_DURATION_MS";
/// Environment variable overriding [`RunnerConfig::default_priority`].
pub const ENV_DEFAULT_PRIORITY: &str = "PRIOQ_DEFAULT_PRIORITY";

/// Configuration for runner behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Simulated duration of one work unit (milliseconds).
    pub unit_duration_ms: u64,
    /// Priority given to requests that do not carry one.
    pub default_priority: Priority,
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
    /// How long a client waits for the runner to answer (milliseconds).
    pub reply_timeout_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            unit_duration_ms: 1000,
            default_priority: 5,
            event_capacity: 1024,
            reply_timeout_ms: 5000,
        }
    }
}

impl RunnerConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default config with `PRIOQ_*` environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up through `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_UNIT_DURATION_MS) {
            self.unit_duration_ms = parse_env(ENV_UNIT_DURATION_MS, value)?;
        }
        if let Some(value) = lookup(ENV_DEFAULT_PRIORITY) {
            self.default_priority = parse_env(ENV_DEFAULT_PRIORITY, value)?;
        }
        Ok(self)
    }

    /// Set the simulated unit duration.
    pub fn with_unit_duration(mut self, duration: Duration) -> Self {
        self.unit_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the default priority.
    pub fn with_default_priority(mut self, priority: Priority) -> Self {
        self.default_priority = priority;
        self
    }

    pub fn unit_duration(&self) -> Duration {
        Duration::from_millis(self.unit_duration_ms)
    }

    pub fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms)
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}
