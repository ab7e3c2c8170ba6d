//! Runner actor driving a job runner one work unit at a time.

use chrono::Utc;
use prioq_core::{Advisory, JobRunner, RunnerEvent, RunnerState, Step};
use ractor::{Actor, ActorProcessingErr, ActorRef};
use tokio::sync::broadcast;

use crate::messages::RunnerMessage;

/// State for the runner actor.
pub struct RunnerActorState {
    /// The session being simulated.
    runner: JobRunner,
    /// Event broadcaster.
    event_tx: broadcast::Sender<RunnerEvent>,
    /// Whether a `UnitBoundary` is scheduled. At most one is outstanding.
    boundary_pending: bool,
}

impl RunnerActorState {
    /// Create a new runner actor state.
    pub fn new(runner: JobRunner, event_tx: broadcast::Sender<RunnerEvent>) -> Self {
        Self {
            runner,
            event_tx,
            boundary_pending: false,
        }
    }

    /// Broadcast an event.
    fn broadcast(&self, event: RunnerEvent) {
        let _ = self.event_tx.send(event);
    }

    fn advise(&self, advisory: &Advisory) {
        self.broadcast(RunnerEvent::Advisory {
            session_id: self.runner.session_id(),
            advisory: advisory.clone(),
            timestamp: Utc::now(),
        });
    }

    /// Broadcast a state change if the runner left `old_state`.
    fn announce_state(&self, old_state: RunnerState) {
        let new_state = self.runner.state();
        if new_state == old_state {
            return;
        }
        tracing::info!("Runner {}: {} -> {}", self.runner.session_id(), old_state, new_state);
        self.broadcast(RunnerEvent::StateChanged {
            session_id: self.runner.session_id(),
            old_state,
            new_state,
            timestamp: Utc::now(),
        });
    }

    /// Step the runner until it needs to suspend or has nothing to do.
    fn drive(&mut self, myself: &ActorRef<RunnerMessage>) {
        let session_id = self.runner.session_id();
        loop {
            let old_state = self.runner.state();
            let step = self.runner.step();
            let timestamp = Utc::now();

            match step {
                Step::Dispatched(job) => {
                    tracing::info!("Dispatching job {} '{}' (p={})", job.id, job.name, job.priority);
                    self.broadcast(RunnerEvent::JobStarted {
                        session_id,
                        job_id: job.id,
                        timestamp,
                    });
                }
                Step::Unit(progress) => {
                    tracing::debug!(
                        "Job {} unit {}/{}",
                        progress.job_id,
                        progress.unit,
                        progress.total_units
                    );
                    self.broadcast(RunnerEvent::UnitProgress {
                        session_id,
                        progress,
                        timestamp,
                    });
                    self.schedule_boundary(myself);
                    return;
                }
                Step::Completed(job) => {
                    tracing::info!("Job {} '{}' completed", job.id, job.name);
                    self.broadcast(RunnerEvent::JobCompleted {
                        session_id,
                        job_id: job.id,
                        work_units: job.work_units,
                        timestamp,
                    });
                    self.advise(&Advisory::success(format!("{} completed", job.name)));
                }
                Step::Requeued(job) => {
                    tracing::info!(
                        "Job {} paused with {} units left; requeued",
                        job.id,
                        job.work_units
                    );
                    self.broadcast(RunnerEvent::JobRequeued {
                        session_id,
                        job,
                        timestamp,
                    });
                }
                Step::Drained(advisory) => {
                    self.broadcast(RunnerEvent::Drained {
                        session_id,
                        timestamp,
                    });
                    self.advise(&advisory);
                    self.announce_state(old_state);
                    return;
                }
                Step::Idle => return,
            }
        }
    }

    /// Suspend for one unit duration, then deliver a `UnitBoundary`.
    fn schedule_boundary(&mut self, myself: &ActorRef<RunnerMessage>) {
        self.boundary_pending = true;
        let delay = self.runner.config().unit_duration();
        let myself = myself.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if myself.send_message(RunnerMessage::UnitBoundary).is_err() {
                tracing::debug!("Runner stopped before the unit boundary");
            }
        });
    }
}

/// Runner actor that owns one simulation session.
pub struct RunnerActor;

impl Actor for RunnerActor {
    type Msg = RunnerMessage;
    type State = RunnerActorState;
    type Arguments = RunnerActorState;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("Starting runner session {}", args.runner.session_id());
        Ok(args)
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            RunnerMessage::Enqueue { request, reply } => {
                let (job, advisory) = state.runner.enqueue(request);
                state.broadcast(RunnerEvent::JobEnqueued {
                    session_id: state.runner.session_id(),
                    job: job.clone(),
                    timestamp: Utc::now(),
                });
                state.advise(&advisory);
                let _ = reply.send((job, advisory));
            }

            RunnerMessage::Start { reply } => {
                let old_state = state.runner.state();
                let advisory = state.runner.start();
                state.advise(&advisory);
                state.announce_state(old_state);
                let _ = reply.send(advisory);

                // A pending boundary already continues the in-flight job.
                if state.runner.is_running() && !state.boundary_pending {
                    state.drive(&myself);
                }
            }

            RunnerMessage::Pause { reply } => {
                let old_state = state.runner.state();
                let advisory = state.runner.pause();
                state.advise(&advisory);
                state.announce_state(old_state);
                let _ = reply.send(advisory);
            }

            RunnerMessage::Clear { reply } => {
                let advisory = state.runner.clear();
                if !advisory.is_rejection() {
                    state.broadcast(RunnerEvent::QueueCleared {
                        session_id: state.runner.session_id(),
                        timestamp: Utc::now(),
                    });
                }
                state.advise(&advisory);
                let _ = reply.send(advisory);
            }

            RunnerMessage::Snapshot { reply } => {
                let _ = reply.send(state.runner.snapshot());
            }

            RunnerMessage::UnitBoundary => {
                state.boundary_pending = false;
                state.drive(&myself);
            }

            RunnerMessage::Shutdown => {
                tracing::info!("Shutting down runner session {}", state.runner.session_id());
                myself.stop(None);
            }
        }

        Ok(())
    }
}
