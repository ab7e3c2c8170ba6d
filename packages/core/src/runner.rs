//! Job runner state machine.
//!
//! [`JobRunner`] holds everything one simulation session needs: the priority
//! queue, the running flag, the job currently in flight and the completion
//! counters. It performs no I/O and never sleeps. A driver calls
//! [`JobRunner::step`] at every unit boundary and suspends for one unit
//! duration each time it gets back [`Step::Unit`]; the running flag is only
//! observed at those boundaries, so work units are never split.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::advisory::Advisory;
use crate::config::RunnerConfig;
use crate::job::{Job, JobId, JobRequest};
use crate::priority_queue::{Priority, PriorityQueue};

/// Unique identifier for a runner session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Ulid);

impl SessionId {
    /// Create a new unique session ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse a session ID from a string.
    pub fn parse(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Durable runner states. A paused runner is simply idle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerState {
    #[default]
    Idle,
    Running,
}

impl std::fmt::Display for RunnerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunnerState::Idle => write!(f, "idle"),
            RunnerState::Running => write!(f, "running"),
        }
    }
}

/// Progress report for the unit about to be executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitProgress {
    pub job_id: JobId,
    pub name: String,
    /// 1-based index of the current unit.
    pub unit: u32,
    pub total_units: u32,
    pub priority: Priority,
}

/// Counters for a runner session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerStats {
    /// Jobs waiting in the queue.
    pub pending_jobs: u64,
    /// Work units waiting in the queue.
    pub pending_units: u64,
    /// Jobs that ran all of their units.
    pub completed_jobs: u64,
    /// Units of completed jobs.
    pub completed_units: u64,
}

/// Point-in-time view of a runner for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub session_id: SessionId,
    pub state: RunnerState,
    /// Queued jobs in dequeue order.
    pub jobs: Vec<Job>,
    /// Job in flight, if any, with the last unit reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<UnitProgress>,
    pub stats: RunnerStats,
}

/// Outcome of one [`JobRunner::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The most urgent job was taken off the queue.
    Dispatched(Job),
    /// A unit is executing; suspend for one unit duration before stepping again.
    Unit(UnitProgress),
    /// The in-flight job ran all of its units.
    Completed(Job),
    /// A pause was observed; the remainder went back into the queue.
    Requeued(Job),
    /// The queue ran dry while running; the runner is idle again.
    Drained(Advisory),
    /// Not running and nothing in flight.
    Idle,
}

#[derive(Debug, Clone)]
struct InFlight {
    job: Job,
    next_unit: u32,
}

impl InFlight {
    fn progress(&self, unit: u32) -> UnitProgress {
        UnitProgress {
            job_id: self.job.id,
            name: self.job.name.clone(),
            unit,
            total_units: self.job.work_units,
            priority: self.job.priority,
        }
    }
}

/// Single-session scheduler over a [`PriorityQueue`] of jobs.
#[derive(Debug)]
pub struct JobRunner {
    session_id: SessionId,
    config: RunnerConfig,
    queue: PriorityQueue<Job>,
    running: bool,
    in_flight: Option<InFlight>,
    next_job_id: u64,
    completed_jobs: u64,
    completed_units: u64,
}

impl JobRunner {
    /// Create an idle runner with an empty queue.
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            session_id: SessionId::new(),
            config,
            queue: PriorityQueue::new(),
            running: false,
            in_flight: None,
            next_job_id: 1,
            completed_jobs: 0,
            completed_units: 0,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn queue(&self) -> &PriorityQueue<Job> {
        &self.queue
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn state(&self) -> RunnerState {
        if self.running {
            RunnerState::Running
        } else {
            RunnerState::Idle
        }
    }

    /// The job in flight and the last unit reported for it.
    pub fn current(&self) -> Option<UnitProgress> {
        self.in_flight
            .as_ref()
            .map(|flight| flight.progress(flight.next_unit.saturating_sub(1)))
    }

    /// Normalize `request` into a job and queue it.
    pub fn enqueue(&mut self, request: JobRequest) -> (Job, Advisory) {
        let id = JobId(self.next_job_id);
        self.next_job_id += 1;

        let job = request.into_job(id, self.config.default_priority);
        self.queue.enqueue(job.clone(), job.priority);

        let advisory = Advisory::success(format!(
            "{} added (p={}, w={})",
            job.name, job.priority, job.work_units
        ));
        (job, advisory)
    }

    /// Begin (or resume) draining the queue.
    pub fn start(&mut self) -> Advisory {
        if self.running {
            return Advisory::info("Already processing");
        }
        if self.queue.is_empty() && self.in_flight.is_none() {
            return Advisory::error("No jobs to process");
        }
        self.running = true;
        Advisory::info("Processing started")
    }

    /// Request a pause, observed at the next unit boundary.
    pub fn pause(&mut self) -> Advisory {
        if !self.running {
            return Advisory::info("Processing is not running");
        }
        self.running = false;
        Advisory::warning("Processing paused")
    }

    /// Drop every queued job and any paused in-flight job.
    pub fn clear(&mut self) -> Advisory {
        if self.running {
            return Advisory::warning("Cannot clear the queue while processing");
        }
        let dropped = self.queue.len() + usize::from(self.in_flight.is_some());
        self.queue.clear();
        self.in_flight = None;
        Advisory::success(format!("Queue cleared ({dropped} jobs removed)"))
    }

    /// Advance to the next unit boundary.
    pub fn step(&mut self) -> Step {
        let Some(mut flight) = self.in_flight.take() else {
            if !self.running {
                return Step::Idle;
            }
            return match self.queue.dequeue() {
                Some(job) => {
                    self.in_flight = Some(InFlight {
                        job: job.clone(),
                        next_unit: 1,
                    });
                    Step::Dispatched(job)
                }
                None => {
                    self.running = false;
                    Step::Drained(Advisory::success("All jobs processed"))
                }
            };
        };

        if flight.next_unit > flight.job.work_units {
            self.completed_jobs += 1;
            self.completed_units += u64::from(flight.job.work_units);
            return Step::Completed(flight.job);
        }

        if !self.running {
            let left = flight.job.work_units - (flight.next_unit - 1);
            let successor = flight.job.remaining(left);
            self.queue.enqueue(successor.clone(), successor.priority);
            return Step::Requeued(successor);
        }

        let progress = flight.progress(flight.next_unit);
        flight.next_unit += 1;
        self.in_flight = Some(flight);
        Step::Unit(progress)
    }

    pub fn stats(&self) -> RunnerStats {
        RunnerStats {
            pending_jobs: self.queue.len() as u64,
            pending_units: self
                .queue
                .iter_unordered()
                .map(|job| u64::from(job.work_units))
                .sum(),
            completed_jobs: self.completed_jobs,
            completed_units: self.completed_units,
        }
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            session_id: self.session_id,
            state: self.state(),
            jobs: self.queue.to_vec(),
            current: self.current(),
            stats: self.stats(),
        }
    }
}
