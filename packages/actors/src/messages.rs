//! Message types for actor communication.

use prioq_core::{Advisory, Job, JobRequest, QueueSnapshot};
use ractor::RpcReplyPort;

/// Messages for the RunnerActor.
#[derive(Debug)]
pub enum RunnerMessage {
    /// Enqueue a new job.
    Enqueue {
        request: JobRequest,
        reply: RpcReplyPort<(Job, Advisory)>,
    },

    /// Start or resume draining the queue.
    Start { reply: RpcReplyPort<Advisory> },

    /// Pause at the next unit boundary.
    Pause { reply: RpcReplyPort<Advisory> },

    /// Clear the queue (rejected while running).
    Clear { reply: RpcReplyPort<Advisory> },

    /// Get the queue contents and counters.
    Snapshot { reply: RpcReplyPort<QueueSnapshot> },

    /// The simulated duration of the current unit has elapsed.
    UnitBoundary,

    /// Stop the runner.
    Shutdown,
}
