//! Event types for real-time updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Advisory, Job, JobId, RunnerState, SessionId, UnitProgress};

/// Events emitted by a runner session for display layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunnerEvent {
    /// A new job was enqueued.
    JobEnqueued {
        session_id: SessionId,
        job: Job,
        timestamp: DateTime<Utc>,
    },
    /// A job was taken off the queue.
    JobStarted {
        session_id: SessionId,
        job_id: JobId,
        timestamp: DateTime<Utc>,
    },
    /// A work unit began executing.
    UnitProgress {
        session_id: SessionId,
        progress: UnitProgress,
        timestamp: DateTime<Utc>,
    },
    /// A job ran all of its units.
    JobCompleted {
        session_id: SessionId,
        job_id: JobId,
        work_units: u32,
        timestamp: DateTime<Utc>,
    },
    /// A paused job's remainder went back into the queue.
    JobRequeued {
        session_id: SessionId,
        job: Job,
        timestamp: DateTime<Utc>,
    },
    /// The runner switched between idle and running.
    StateChanged {
        session_id: SessionId,
        old_state: RunnerState,
        new_state: RunnerState,
        timestamp: DateTime<Utc>,
    },
    /// The queue was emptied on request.
    QueueCleared {
        session_id: SessionId,
        timestamp: DateTime<Utc>,
    },
    /// Every queued job was processed.
    Drained {
        session_id: SessionId,
        timestamp: DateTime<Utc>,
    },
    /// Outcome message of an operation.
    Advisory {
        session_id: SessionId,
        advisory: Advisory,
        timestamp: DateTime<Utc>,
    },
}

impl RunnerEvent {
    /// Get the timestamp of the event.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            RunnerEvent::JobEnqueued { timestamp, .. } => *timestamp,
            RunnerEvent::JobStarted { timestamp, .. } => *timestamp,
            RunnerEvent::UnitProgress { timestamp, .. } => *timestamp,
            RunnerEvent::JobCompleted { timestamp, .. } => *timestamp,
            RunnerEvent::JobRequeued { timestamp, .. } => *timestamp,
            RunnerEvent::StateChanged { timestamp, .. } => *timestamp,
            RunnerEvent::QueueCleared { timestamp, .. } => *timestamp,
            RunnerEvent::Drained { timestamp, .. } => *timestamp,
            RunnerEvent::Advisory { timestamp, .. } => *timestamp,
        }
    }

    /// Get the session that emitted this event.
    pub fn session_id(&self) -> SessionId {
        match self {
            RunnerEvent::JobEnqueued { session_id, .. } => *session_id,
            RunnerEvent::JobStarted { session_id, .. } => *session_id,
            RunnerEvent::UnitProgress { session_id, .. } => *session_id,
            RunnerEvent::JobCompleted { session_id, .. } => *session_id,
            RunnerEvent::JobRequeued { session_id, .. } => *session_id,
            RunnerEvent::StateChanged { session_id, .. } => *session_id,
            RunnerEvent::QueueCleared { session_id, .. } => *session_id,
            RunnerEvent::Drained { session_id, .. } => *session_id,
            RunnerEvent::Advisory { session_id, .. } => *session_id,
        }
    }

    /// Get the job ID associated with this event, if any.
    pub fn job_id(&self) -> Option<JobId> {
        match self {
            RunnerEvent::JobEnqueued { job, .. } => Some(job.id),
            RunnerEvent::JobStarted { job_id, .. } => Some(*job_id),
            RunnerEvent::UnitProgress { progress, .. } => Some(progress.job_id),
            RunnerEvent::JobCompleted { job_id, .. } => Some(*job_id),
            RunnerEvent::JobRequeued { job, .. } => Some(job.id),
            _ => None,
        }
    }

    /// Get a short description of this event for logging.
    pub fn description(&self) -> String {
        match self {
            RunnerEvent::JobEnqueued { job, .. } => format!(
                "Job {} '{}' enqueued (p={}, w={})",
                job.id, job.name, job.priority, job.work_units
            ),
            RunnerEvent::JobStarted { job_id, .. } => format!("Job {} started", job_id),
            RunnerEvent::UnitProgress { progress, .. } => format!(
                "Processing '{}' ({}/{}) p={}",
                progress.name, progress.unit, progress.total_units, progress.priority
            ),
            RunnerEvent::JobCompleted {
                job_id, work_units, ..
            } => format!("Job {} completed ({} units)", job_id, work_units),
            RunnerEvent::JobRequeued { job, .. } => format!(
                "Job {} requeued with {} units left",
                job.id, job.work_units
            ),
            RunnerEvent::StateChanged { new_state, .. } => format!("Runner -> {}", new_state),
            RunnerEvent::QueueCleared { .. } => "Queue cleared".to_string(),
            RunnerEvent::Drained { .. } => "All jobs processed".to_string(),
            RunnerEvent::Advisory { advisory, .. } => advisory.to_string(),
        }
    }
}
