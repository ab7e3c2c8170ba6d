mod common;

use std::error::Error;

use prioq_actors::start_runner;
use prioq_core::{AdvisoryLevel, JobRequest, RunnerEvent, RunnerState};

#[tokio::test(start_paused = true)]
async fn test_start_on_empty_queue_reports_error() -> Result<(), Box<dyn Error>> {
    let runner = start_runner(common::config()).await?;

    let advisory = runner.start().await?;
    assert_eq!(advisory.level, AdvisoryLevel::Error);

    let snapshot = runner.snapshot().await?;
    assert_eq!(snapshot.state, RunnerState::Idle);
    assert!(snapshot.jobs.is_empty());

    runner.shutdown().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_drains_by_priority_then_arrival() -> Result<(), Box<dyn Error>> {
    let runner = start_runner(common::config()).await?;
    let mut events = runner.subscribe();

    let (a, _) = runner.enqueue(JobRequest::new("A", 2).with_priority(1)).await?;
    let (b, _) = runner.enqueue(JobRequest::new("B", 1).with_priority(0)).await?;
    let (c, _) = runner.enqueue(JobRequest::new("C", 1).with_priority(1)).await?;

    let listed: Vec<_> = runner.snapshot().await?.jobs.into_iter().map(|j| j.id).collect();
    assert_eq!(listed, vec![b.id, a.id, c.id]);

    assert_eq!(runner.start().await?.level, AdvisoryLevel::Info);
    let seen = common::collect_until_drained(&mut events).await?;

    assert_eq!(common::started_ids(&seen), vec![b.id, a.id, c.id]);
    let units: Vec<_> = seen
        .iter()
        .filter_map(|event| match event {
            RunnerEvent::UnitProgress { progress, .. } => {
                Some((progress.job_id, progress.unit, progress.total_units))
            }
            _ => None,
        })
        .collect();
    assert_eq!(units, vec![(b.id, 1, 1), (a.id, 1, 2), (a.id, 2, 2), (c.id, 1, 1)]);

    let snapshot = runner.snapshot().await?;
    assert_eq!(snapshot.state, RunnerState::Idle);
    assert_eq!(snapshot.stats.completed_jobs, 3);
    assert_eq!(snapshot.stats.completed_units, 4);
    assert_eq!(snapshot.stats.pending_jobs, 0);

    runner.shutdown().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_pause_after_second_unit_requeues_remainder() -> Result<(), Box<dyn Error>> {
    let runner = start_runner(common::config()).await?;
    let mut events = runner.subscribe();

    let (job, _) = runner.enqueue(JobRequest::new("work3", 3).with_priority(2)).await?;
    runner.start().await?;

    common::wait_for(&mut events, |event| {
        matches!(event, RunnerEvent::UnitProgress { progress, .. } if progress.unit == 2)
    })
    .await?;
    assert_eq!(runner.pause().await?.level, AdvisoryLevel::Warning);

    let requeued = common::wait_for(&mut events, |event| {
        matches!(event, RunnerEvent::JobRequeued { .. })
    })
    .await?;
    match requeued {
        RunnerEvent::JobRequeued { job: rest, .. } => {
            assert_eq!(rest.id, job.id);
            assert_eq!(rest.work_units, 1);
            assert_eq!(rest.priority, 2);
        }
        other => panic!("unexpected event {other:?}"),
    }

    let snapshot = runner.snapshot().await?;
    assert_eq!(snapshot.state, RunnerState::Idle);
    assert_eq!(snapshot.jobs.len(), 1);
    assert_eq!(snapshot.jobs[0].work_units, 1);
    assert_eq!(snapshot.jobs[0].priority, 2);
    assert_eq!(snapshot.stats.completed_jobs, 0);
    assert_eq!(snapshot.current, None);

    runner.shutdown().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_resume_before_boundary_continues_same_job() -> Result<(), Box<dyn Error>> {
    let runner = start_runner(common::config()).await?;
    let mut events = runner.subscribe();

    let (job, _) = runner.enqueue(JobRequest::new("steady", 3).with_priority(0)).await?;
    runner.start().await?;

    common::wait_for(&mut events, |event| {
        matches!(event, RunnerEvent::UnitProgress { progress, .. } if progress.unit == 1)
    })
    .await?;
    runner.pause().await?;
    assert_eq!(runner.start().await?.level, AdvisoryLevel::Info);

    let seen = common::collect_until_drained(&mut events).await?;

    assert!(!seen.iter().any(|e| matches!(e, RunnerEvent::JobRequeued { .. })));
    assert!(common::started_ids(&seen).is_empty());
    assert!(seen.iter().any(
        |e| matches!(e, RunnerEvent::JobCompleted { job_id, work_units: 3, .. } if *job_id == job.id)
    ));

    let stats = runner.snapshot().await?.stats;
    assert_eq!(stats.completed_jobs, 1);
    assert_eq!(stats.completed_units, 3);

    runner.shutdown().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_pause_during_first_unit_requeues_rest_of_job() -> Result<(), Box<dyn Error>> {
    let config = common::config();
    let unit = config.unit_duration();
    let runner = start_runner(config).await?;
    let mut events = runner.subscribe();

    let (a, _) = runner.enqueue(JobRequest::new("A", 2).with_priority(1)).await?;
    runner.enqueue(JobRequest::new("B", 1).with_priority(0)).await?;
    runner.enqueue(JobRequest::new("C", 1).with_priority(1)).await?;
    runner.enqueue(JobRequest::new("", 0)).await?;
    runner.start().await?;

    // B fills the first unit, so this lands halfway through A's first unit.
    tokio::time::sleep(unit + unit / 2).await;
    assert_eq!(runner.pause().await?.level, AdvisoryLevel::Warning);

    let requeued = common::wait_for(&mut events, |event| {
        matches!(event, RunnerEvent::JobRequeued { .. })
    })
    .await?;
    match requeued {
        RunnerEvent::JobRequeued { job, .. } => {
            assert_eq!(job.id, a.id);
            assert_eq!(job.work_units, 1);
        }
        other => panic!("unexpected event {other:?}"),
    }

    let snapshot = runner.snapshot().await?;
    let queued: Vec<_> = snapshot
        .jobs
        .iter()
        .map(|j| (j.name.as_str(), j.work_units))
        .collect();
    assert_eq!(queued, vec![("C", 1), ("A", 1), ("Job-4", 1)]);
    assert_eq!(snapshot.stats.completed_jobs, 1);
    assert_eq!(snapshot.state, RunnerState::Idle);

    runner.shutdown().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_clear_then_restart_before_boundary_runs_only_new_job() -> Result<(), Box<dyn Error>> {
    let runner = start_runner(common::config()).await?;
    let mut events = runner.subscribe();

    runner.enqueue(JobRequest::new("dropped", 2)).await?;
    runner.start().await?;
    common::wait_for(&mut events, |event| {
        matches!(event, RunnerEvent::UnitProgress { progress, .. } if progress.unit == 1)
    })
    .await?;

    // All of this happens before the boundary of the dropped job's first unit.
    runner.pause().await?;
    assert_eq!(runner.clear().await?.level, AdvisoryLevel::Success);
    let (fresh, _) = runner.enqueue(JobRequest::new("fresh", 1)).await?;
    assert_eq!(runner.start().await?.level, AdvisoryLevel::Info);

    let seen = common::collect_until_drained(&mut events).await?;

    assert_eq!(common::started_ids(&seen), vec![fresh.id]);
    assert!(!seen.iter().any(|e| matches!(e, RunnerEvent::JobRequeued { .. })));

    let stats = runner.snapshot().await?.stats;
    assert_eq!(stats.completed_jobs, 1);
    assert_eq!(stats.pending_jobs, 0);

    runner.shutdown().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_clear_is_rejected_while_running() -> Result<(), Box<dyn Error>> {
    let runner = start_runner(common::config()).await?;
    let mut events = runner.subscribe();

    runner.enqueue(JobRequest::new("first", 2)).await?;
    runner.enqueue(JobRequest::new("second", 2)).await?;
    runner.start().await?;

    common::wait_for(&mut events, |e| matches!(e, RunnerEvent::UnitProgress { .. })).await?;
    let rejected = runner.clear().await?;
    assert_eq!(rejected.level, AdvisoryLevel::Warning);
    assert_eq!(runner.snapshot().await?.jobs.len(), 1);

    runner.pause().await?;
    common::wait_for(&mut events, |e| matches!(e, RunnerEvent::JobRequeued { .. })).await?;

    let cleared = runner.clear().await?;
    assert_eq!(cleared.level, AdvisoryLevel::Success);
    let snapshot = runner.snapshot().await?;
    assert!(snapshot.jobs.is_empty());
    assert_eq!(runner.start().await?.level, AdvisoryLevel::Error);

    runner.shutdown().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_jobs_enqueued_while_running_join_the_run() -> Result<(), Box<dyn Error>> {
    let runner = start_runner(common::config()).await?;
    let mut events = runner.subscribe();

    let (slow, _) = runner.enqueue(JobRequest::new("slow", 2).with_priority(5)).await?;
    runner.start().await?;
    common::wait_for(&mut events, |e| matches!(e, RunnerEvent::UnitProgress { .. })).await?;

    let (urgent, _) = runner.enqueue(JobRequest::new("urgent", 1).with_priority(0)).await?;
    let seen = common::collect_until_drained(&mut events).await?;

    assert_eq!(common::started_ids(&seen), vec![urgent.id]);
    assert!(seen.iter().any(
        |e| matches!(e, RunnerEvent::JobCompleted { job_id, .. } if *job_id == slow.id)
    ));
    assert_eq!(runner.snapshot().await?.stats.completed_jobs, 2);

    runner.shutdown().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_sessions_are_isolated() -> Result<(), Box<dyn Error>> {
    let first = start_runner(common::config()).await?;
    let second = start_runner(common::config()).await?;
    assert_ne!(first.session_id(), second.session_id());

    let mut first_events = first.subscribe();
    first.enqueue(JobRequest::new("only-first", 1)).await?;

    let event = common::wait_for(&mut first_events, |e| {
        matches!(e, RunnerEvent::JobEnqueued { .. })
    })
    .await?;
    assert_eq!(event.session_id(), first.session_id());
    assert!(second.snapshot().await?.jobs.is_empty());

    first.shutdown().await?;
    second.shutdown().await?;
    Ok(())
}
