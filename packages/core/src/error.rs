//! Error types for the core crate.

use thiserror::Error;

/// Failure to load a [`RunnerConfig`](crate::RunnerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value {value:?} for environment variable {key}")]
    InvalidEnv { key: &'static str, value: String },
}
