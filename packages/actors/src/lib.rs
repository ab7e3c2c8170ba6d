//! Actor shell for the priority-queue job runner.
//!
//! This crate runs a [`prioq_core::JobRunner`] inside a Ractor actor so that
//! pause requests and queue reads can interleave with simulated work.
//!
//! # Architecture
//!
//! - `RunnerActor` - Owns one session; steps the runner and sleeps one unit
//!   duration between work units
//! - `RunnerHandle` - Async client API (enqueue, start, pause, clear, snapshot)
//!
//! # Usage
//!
//! ```ignore
//! use prioq_actors::start_runner;
//! use prioq_core::{JobRequest, RunnerConfig};
//!
//! let runner = start_runner(RunnerConfig::default()).await?;
//! let mut events = runner.subscribe();
//! runner.enqueue(JobRequest::new("render", 3).with_priority(1)).await?;
//! runner.start().await?;
//! ```

mod error;
mod handle;
mod messages;
mod runner_actor;

pub use error::RunnerError;
pub use handle::{RunnerHandle, start_runner};
pub use messages::RunnerMessage;
pub use runner_actor::{RunnerActor, RunnerActorState};

/// Re-export ractor types for convenience.
pub use ractor::{Actor, ActorRef, RpcReplyPort};
