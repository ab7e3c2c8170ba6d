use std::error::Error;
use std::time::Duration;

use prioq_core::{JobId, RunnerConfig, RunnerEvent};
use tokio::sync::broadcast;

/// Virtual time is paused in these tests, so this only bounds runaway loops.
const WAIT: Duration = Duration::from_secs(600);

pub fn config() -> RunnerConfig {
    RunnerConfig::default().with_unit_duration(Duration::from_millis(1000))
}

/// Receive events until one matches `predicate`.
pub async fn wait_for<F>(
    events: &mut broadcast::Receiver<RunnerEvent>,
    mut predicate: F,
) -> Result<RunnerEvent, Box<dyn Error>>
where
    F: FnMut(&RunnerEvent) -> bool,
{
    loop {
        let event = tokio::time::timeout(WAIT, events.recv()).await??;
        if predicate(&event) {
            return Ok(event);
        }
    }
}

/// Receive events up to and including `Drained`.
pub async fn collect_until_drained(
    events: &mut broadcast::Receiver<RunnerEvent>,
) -> Result<Vec<RunnerEvent>, Box<dyn Error>> {
    let mut seen = Vec::new();
    loop {
        let event = tokio::time::timeout(WAIT, events.recv()).await??;
        let done = matches!(event, RunnerEvent::Drained { .. });
        seen.push(event);
        if done {
            return Ok(seen);
        }
    }
}

/// Job ids in the order the runner dispatched them.
pub fn started_ids(events: &[RunnerEvent]) -> Vec<JobId> {
    events
        .iter()
        .filter_map(|event| match event {
            RunnerEvent::JobStarted { job_id, .. } => Some(*job_id),
            _ => None,
        })
        .collect()
}
