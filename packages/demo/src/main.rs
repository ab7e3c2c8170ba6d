//! Console stand-in for the scheduler page: queues a few jobs, runs them,
//! pauses mid-job, resumes and prints the final snapshot.

use std::error::Error;
use std::time::Duration;

use prioq_actors::{RunnerHandle, start_runner};
use prioq_core::{
    Advisory, AdvisoryLevel, Job, JobRequest, RunnerConfig, RunnerEvent, RunnerState,
};
use tokio::sync::broadcast;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = RunnerConfig::from_env()?;
    let unit = config.unit_duration();
    let runner = start_runner(config).await?;

    let mut events = runner.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            // Advisories are reported where the operation was invoked.
            if !matches!(event, RunnerEvent::Advisory { .. }) {
                tracing::info!("{}", event.description());
            }
        }
    });

    for request in [
        JobRequest::new("A", 2).with_priority(1),
        JobRequest::new("B", 1).with_priority(0),
        JobRequest::new("C", 1).with_priority(1),
        JobRequest::new("", 0),
    ] {
        runner.enqueue(request).await?;
    }

    report(&runner.start().await?);
    report(&runner.start().await?);
    report(&runner.clear().await?);

    // B takes the first unit; pause during A's first unit so A is requeued
    // at its next boundary, then pick up where it left off.
    let mut requeues = runner.subscribe();
    tokio::time::sleep(unit + unit / 2).await;
    report(&runner.pause().await?);
    match wait_for_requeue(&mut requeues, unit * 2).await {
        Some(job) => tracing::info!(
            "{} {} requeued with {} unit(s) left",
            job.id,
            job.name,
            job.work_units
        ),
        None => tracing::warn!("No job was requeued by the pause"),
    }
    print_snapshot(&runner).await?;

    report(&runner.start().await?);
    while runner.snapshot().await?.state == RunnerState::Running {
        tokio::time::sleep(unit).await;
    }
    print_snapshot(&runner).await?;

    runner.shutdown().await?;
    printer.abort();
    Ok(())
}

fn report(advisory: &Advisory) {
    match advisory.level {
        AdvisoryLevel::Success | AdvisoryLevel::Info => tracing::info!("{}", advisory),
        AdvisoryLevel::Warning => tracing::warn!("{}", advisory),
        AdvisoryLevel::Error => tracing::error!("{}", advisory),
    }
}

/// Wait for the paused job to come back to the queue, or give up after `limit`.
async fn wait_for_requeue(
    events: &mut broadcast::Receiver<RunnerEvent>,
    limit: Duration,
) -> Option<Job> {
    let requeued = async {
        loop {
            match events.recv().await {
                Ok(RunnerEvent::JobRequeued { job, .. }) => return Some(job),
                Ok(RunnerEvent::Drained { .. }) | Err(broadcast::error::RecvError::Closed) => {
                    return None;
                }
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
            }
        }
    };
    tokio::time::timeout(limit, requeued).await.ok().flatten()
}

async fn print_snapshot(runner: &RunnerHandle) -> Result<(), Box<dyn Error>> {
    let snapshot = runner.snapshot().await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
