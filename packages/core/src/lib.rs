//! Core domain types for the priority-queue job runner.
//!
//! This crate has no async runtime and performs no I/O:
//! - `MinHeap` and `PriorityQueue` for ordering work
//! - `Job` and `JobRequest` for work items
//! - `JobRunner`, the step-driven scheduler state machine
//! - Advisories, events and configuration shared with the actor layer

mod advisory;
mod config;
mod error;
mod events;
pub mod heap;
mod job;
pub mod priority_queue;
mod runner;

pub use advisory::{Advisory, AdvisoryLevel};
pub use config::{ENV_DEFAULT_PRIORITY, ENV_UNIT_DURATION_MS, RunnerConfig};
pub use error::ConfigError;
pub use events::RunnerEvent;
pub use heap::{Compare, MinHeap, NaturalOrder};
pub use job::{Job, JobId, JobRequest, MAX_WORK_UNITS};
pub use priority_queue::{Priority, PriorityQueue};
pub use runner::{
    JobRunner, QueueSnapshot, RunnerState, RunnerStats, SessionId, Step, UnitProgress,
};
