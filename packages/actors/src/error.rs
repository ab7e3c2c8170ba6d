//! Errors talking to a runner actor.

use thiserror::Error;

/// Transport failures between a [`RunnerHandle`](crate::RunnerHandle) and its
/// actor. Operation outcomes are advisories, never errors.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn runner: {0}")]
    Spawn(String),

    #[error("failed to reach runner: {0}")]
    Messaging(String),

    #[error("runner did not reply within the timeout")]
    Timeout,

    #[error("runner dropped the reply")]
    ReplyDropped,
}
