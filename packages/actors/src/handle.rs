//! Client handle for a running session.

use std::time::Duration;

use prioq_core::{Advisory, Job, JobRequest, QueueSnapshot, RunnerConfig, RunnerEvent, SessionId};
use ractor::concurrency::JoinHandle;
use ractor::rpc::CallResult;
use ractor::{Actor, ActorRef, RpcReplyPort};
use tokio::sync::broadcast;

use crate::error::RunnerError;
use crate::messages::RunnerMessage;
use crate::runner_actor::{RunnerActor, RunnerActorState};

/// Spawn a runner actor for a fresh session.
pub async fn start_runner(config: RunnerConfig) -> Result<RunnerHandle, RunnerError> {
    let (event_tx, _) = broadcast::channel(config.event_capacity.max(1));
    let reply_timeout = config.reply_timeout();

    let runner = prioq_core::JobRunner::new(config);
    let session_id = runner.session_id();
    let state = RunnerActorState::new(runner, event_tx.clone());

    let (actor, join) = Actor::spawn(Some(format!("runner-{}", session_id)), RunnerActor, state)
        .await
        .map_err(|e| RunnerError::Spawn(e.to_string()))?;

    Ok(RunnerHandle {
        actor,
        join,
        event_tx,
        session_id,
        reply_timeout,
    })
}

/// Async API over a [`RunnerActor`].
///
/// Every operation returns the runner's [`Advisory`]; `Err` only means the
/// actor could not be reached.
pub struct RunnerHandle {
    actor: ActorRef<RunnerMessage>,
    join: JoinHandle<()>,
    event_tx: broadcast::Sender<RunnerEvent>,
    session_id: SessionId,
    reply_timeout: Duration,
}

impl RunnerHandle {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Receive every event emitted from now on, including unit progress.
    pub fn subscribe(&self) -> broadcast::Receiver<RunnerEvent> {
        self.event_tx.subscribe()
    }

    /// Queue a job.
    pub async fn enqueue(&self, request: JobRequest) -> Result<(Job, Advisory), RunnerError> {
        self.call(|reply| RunnerMessage::Enqueue { request, reply })
            .await
    }

    /// Start or resume processing.
    pub async fn start(&self) -> Result<Advisory, RunnerError> {
        self.call(|reply| RunnerMessage::Start { reply }).await
    }

    /// Pause at the next unit boundary.
    pub async fn pause(&self) -> Result<Advisory, RunnerError> {
        self.call(|reply| RunnerMessage::Pause { reply }).await
    }

    /// Clear the queue; rejected with a warning while running.
    pub async fn clear(&self) -> Result<Advisory, RunnerError> {
        self.call(|reply| RunnerMessage::Clear { reply }).await
    }

    /// Queue contents in dequeue order plus counters.
    pub async fn snapshot(&self) -> Result<QueueSnapshot, RunnerError> {
        self.call(|reply| RunnerMessage::Snapshot { reply }).await
    }

    /// Stop the actor and wait for it to exit.
    pub async fn shutdown(self) -> Result<(), RunnerError> {
        self.actor
            .send_message(RunnerMessage::Shutdown)
            .map_err(|e| RunnerError::Messaging(e.to_string()))?;
        self.join
            .await
            .map_err(|e| RunnerError::Messaging(e.to_string()))
    }

    async fn call<T, F>(&self, build: F) -> Result<T, RunnerError>
    where
        T: Send + 'static,
        F: FnOnce(RpcReplyPort<T>) -> RunnerMessage,
    {
        match ractor::rpc::call(&self.actor, build, Some(self.reply_timeout)).await {
            Ok(CallResult::Success(value)) => Ok(value),
            Ok(CallResult::Timeout) => Err(RunnerError::Timeout),
            Ok(CallResult::SenderError) => Err(RunnerError::ReplyDropped),
            Err(e) => Err(RunnerError::Messaging(e.to_string())),
        }
    }
}
