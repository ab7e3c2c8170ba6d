//! Classified, non-fatal status messages returned by runner operations.

use serde::{Deserialize, Serialize};

/// How an advisory should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for AdvisoryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdvisoryLevel::Success => write!(f, "success"),
            AdvisoryLevel::Info => write!(f, "info"),
            AdvisoryLevel::Warning => write!(f, "warning"),
            AdvisoryLevel::Error => write!(f, "error"),
        }
    }
}

/// Outcome message of a runner operation.
///
/// Illegal operation orders (starting twice, clearing while running, starting
/// on an empty queue) are reported through an advisory and otherwise ignored;
/// they are never surfaced as `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub level: AdvisoryLevel,
    pub message: String,
}

impl Advisory {
    pub fn new(level: AdvisoryLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(AdvisoryLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(AdvisoryLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(AdvisoryLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(AdvisoryLevel::Error, message)
    }

    /// True for `Warning` and `Error` advisories.
    pub fn is_rejection(&self) -> bool {
        matches!(self.level, AdvisoryLevel::Warning | AdvisoryLevel::Error)
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}
