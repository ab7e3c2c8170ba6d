//! Job domain types for work items in the queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::priority_queue::Priority;

/// Largest unit count a job may carry. One below `u32::MAX` so the runner's
/// unit cursor can step past the final unit.
pub const MAX_WORK_UNITS: u32 = u32::MAX - 1;

/// Identifier for a job, unique within one runner session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A job is a named amount of work split into atomic units.
///
/// Jobs are never mutated once queued. Pausing a job mid-execution produces a
/// successor via [`Job::remaining`] carrying the same identity and priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Unique identifier for this job.
    pub id: JobId,
    /// Display name.
    pub name: String,
    /// Number of work units still to execute, within `1..=MAX_WORK_UNITS`.
    pub work_units: u32,
    /// Execution priority; lower runs first.
    pub priority: Priority,
    /// When the job was first enqueued.
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Create a new job. `work_units` is clamped to `1..=MAX_WORK_UNITS`.
    pub fn new(id: JobId, name: impl Into<String>, work_units: u32, priority: Priority) -> Self {
        Self {
            id,
            name: name.into(),
            work_units: work_units.clamp(1, MAX_WORK_UNITS),
            priority,
            created_at: Utc::now(),
        }
    }

    /// Successor of this job with only `work_units` left to run.
    pub fn remaining(&self, work_units: u32) -> Self {
        Self {
            work_units: work_units.clamp(1, MAX_WORK_UNITS),
            ..self.clone()
        }
    }
}

/// Unvalidated request to enqueue a job, as typed by a user.
///
/// [`JobRequest::into_job`] normalizes it instead of rejecting it: a blank
/// name becomes `Job-<id>`, a non-positive unit count becomes 1 and a missing
/// priority falls back to the configured default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRequest {
    pub name: String,
    pub work_units: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl JobRequest {
    pub fn new(name: impl Into<String>, work_units: i64) -> Self {
        Self {
            name: name.into(),
            work_units,
            priority: None,
        }
    }

    /// Set the priority for this request.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Build the job this request describes.
    pub fn into_job(self, id: JobId, default_priority: Priority) -> Job {
        let name = match self.name.trim() {
            "" => format!("Job-{}", id.0),
            trimmed => trimmed.to_string(),
        };
        let work_units = u32::try_from(self.work_units.max(1)).unwrap_or(MAX_WORK_UNITS);
        Job::new(
            id,
            name,
            work_units,
            self.priority.unwrap_or(default_priority),
        )
    }
}
