use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use fanpool::{
    CompletionTicket, Config, ConfigError, Event, EventKind, Pipeline, Review, RuntimeError,
    Subscribe,
};

/// Remembers every reviewed ticket in arrival order.
#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<(usize, u64, String)>>,
}

#[async_trait]
impl Review for Recorder {
    async fn review(&self, ticket: &CompletionTicket) {
        self.seen.lock().unwrap().push((
            ticket.worker(),
            ticket.job(),
            ticket.outcome().text().to_string(),
        ));
    }
}

impl Recorder {
    fn jobs(&self) -> Vec<u64> {
        self.seen.lock().unwrap().iter().map(|(_, job, _)| *job).collect()
    }
}

/// Counts events of one kind.
struct Counter {
    kind: EventKind,
    hits: AtomicU64,
}

#[async_trait]
impl Subscribe for Counter {
    async fn on_event(&self, event: &Event) {
        if event.kind == self.kind {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
    }
    fn name(&self) -> &'static str {
        "counter"
    }
}

fn config(concurrency: usize, workload: u64) -> Config {
    let mut cfg = Config::new(concurrency, workload);
    cfg.bus_capacity = 1 << 14;
    cfg
}

fn drain(mut rx: broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        events.push(ev);
    }
    events
}

fn count(events: &[Event], kind: EventKind) -> usize {
    events.iter().filter(|e| e.kind == kind).count()
}

/// Asserts the per-worker step cycle and that each worker received exactly
/// the jobs the dispatcher assigned to it, in the same order.
fn assert_worker_cycles(events: &[Event]) {
    const CYCLE: [EventKind; 4] = [
        EventKind::ReturnReceived,
        EventKind::AssignmentReceived,
        EventKind::JobPublished,
        EventKind::SlotReleased,
    ];

    let mut steps: BTreeMap<usize, Vec<&Event>> = BTreeMap::new();
    let mut assigned: BTreeMap<usize, Vec<u64>> = BTreeMap::new();
    for ev in events {
        if ev.is_worker_step() {
            steps.entry(ev.worker.unwrap()).or_default().push(ev);
        }
        if ev.kind == EventKind::JobAssigned {
            assigned.entry(ev.worker.unwrap()).or_default().push(ev.job.unwrap());
        }
    }

    for (worker, steps) in &steps {
        let mut received = Vec::new();
        for (i, ev) in steps.iter().enumerate() {
            assert_eq!(ev.kind, CYCLE[i % 4], "worker {worker} step {i} out of order");
            match ev.kind {
                EventKind::AssignmentReceived => received.push(ev.job.unwrap()),
                EventKind::JobPublished => assert_eq!(ev.job, received.last().copied()),
                _ => {}
            }
        }
        let expected = assigned.get(worker).cloned().unwrap_or_default();
        assert_eq!(received, expected, "worker {worker} got foreign jobs");
    }
}

#[tokio::test]
async fn test_single_worker_processes_jobs_in_order() {
    let recorder = Arc::new(Recorder::default());
    let pipeline = Pipeline::builder(config(1, 3))
        .with_review(recorder.clone())
        .build()
        .unwrap();
    let rx = pipeline.subscribe();

    let report = pipeline.run().await.unwrap();
    assert_eq!(report.reviewed, 3);

    let seen = recorder.seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            (0, 0, "worker 0 finished job 0".to_string()),
            (0, 1, "worker 0 finished job 1".to_string()),
            (0, 2, "worker 0 finished job 2".to_string()),
        ]
    );

    let events = drain(rx);
    assert_worker_cycles(&events);
    assert_eq!(count(&events, EventKind::JobReviewed), 3);
    assert_eq!(count(&events, EventKind::WorkerExited), 1);
    assert_eq!(count(&events, EventKind::DispatcherFinished), 1);
    assert_eq!(events.last().unwrap().kind, EventKind::AllStopped);
}

#[tokio::test]
async fn test_zero_workload_shuts_down_cleanly() {
    let recorder = Arc::new(Recorder::default());
    let pipeline = Pipeline::builder(config(4, 0))
        .with_review(recorder.clone())
        .build()
        .unwrap();
    let rx = pipeline.subscribe();

    let report = tokio::time::timeout(Duration::from_secs(5), pipeline.run())
        .await
        .expect("run must not hang")
        .unwrap();

    assert_eq!(report.reviewed, 0);
    assert_eq!(report.drained.idle_slots, 4);
    assert_eq!(report.drained.assignments, 0);
    assert_eq!(report.drained.tickets, 0);
    assert!(recorder.jobs().is_empty());

    let events = drain(rx);
    assert_eq!(count(&events, EventKind::JobAssigned), 0);
    assert_eq!(count(&events, EventKind::WorkerExited), 4);
    assert_eq!(count(&events, EventKind::ChannelDrained), 4);
    assert_eq!(count(&events, EventKind::AllStopped), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_job_is_assigned_and_reviewed_exactly_once() {
    let recorder = Arc::new(Recorder::default());
    let pipeline = Pipeline::builder(config(4, 200))
        .with_review(recorder.clone())
        .build()
        .unwrap();
    let rx = pipeline.subscribe();

    let report = pipeline.run().await.unwrap();
    assert_eq!(report.reviewed, 200);
    assert_eq!(report.drained.tickets, 0);
    assert_eq!(report.drained.assignments, 0);

    let mut reviewed = recorder.jobs();
    reviewed.sort_unstable();
    assert_eq!(reviewed, (0..200).collect::<Vec<_>>());

    let events = drain(rx);
    let mut assigned: Vec<u64> = events
        .iter()
        .filter(|e| e.kind == EventKind::JobAssigned)
        .map(|e| e.job.unwrap())
        .collect();
    // the dispatcher hands jobs out in increasing order
    assert!(assigned.windows(2).all(|w| w[0] < w[1]));
    assigned.dedup();
    assert_eq!(assigned.len(), 200);

    assert_worker_cycles(&events);

    let published: u64 = events
        .iter()
        .filter(|e| e.kind == EventKind::WorkerExited)
        .map(|e| e.count.unwrap())
        .sum();
    assert_eq!(published, 200);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_runs_terminate_for_any_shape() {
    for concurrency in 1..=5 {
        for workload in [0, 1, 2, 7, 13, 64] {
            let pipeline = Pipeline::new(config(concurrency, workload)).unwrap();
            let rx = pipeline.subscribe();

            let report = tokio::time::timeout(Duration::from_secs(10), pipeline.run())
                .await
                .unwrap_or_else(|_| panic!("hung at concurrency={concurrency} workload={workload}"))
                .unwrap();
            assert_eq!(report.reviewed, workload);

            let events = drain(rx);
            let exited: HashSet<_> = events
                .iter()
                .filter(|e| {
                    matches!(e.kind, EventKind::WorkerExited | EventKind::DispatcherFinished)
                })
                .map(|e| e.task.clone().unwrap())
                .collect();
            assert_eq!(exited.len(), concurrency + 1);
            assert_eq!(count(&events, EventKind::JobReviewed) as u64, workload);
        }
    }
}

#[tokio::test]
async fn test_custom_compute_fills_the_outcome() {
    let recorder = Arc::new(Recorder::default());
    let pipeline = Pipeline::builder(config(2, 10))
        .with_compute(|_worker: usize, job: u64, out: &mut String| {
            out.push_str(&(job * job).to_string());
        })
        .with_review(recorder.clone())
        .build()
        .unwrap();

    pipeline.run().await.unwrap();

    for (_, job, text) in recorder.seen.lock().unwrap().iter() {
        assert_eq!(*text, (job * job).to_string());
    }
}

#[tokio::test]
async fn test_subscribers_are_flushed_before_run_returns() {
    let counter = Arc::new(Counter {
        kind: EventKind::JobReviewed,
        hits: AtomicU64::new(0),
    });
    let pipeline = Pipeline::builder(config(3, 50))
        .with_subscribers(vec![counter.clone() as Arc<dyn Subscribe>])
        .build()
        .unwrap();

    pipeline.run().await.unwrap();
    assert_eq!(counter.hits.load(Ordering::Relaxed), 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_panicking_worker_ends_the_run() {
    let pipeline = Pipeline::builder(config(2, 20))
        .with_compute(|worker: usize, job: u64, out: &mut String| {
            if job == 5 {
                panic!("cannot compute job {job}");
            }
            out.push_str(&format!("{worker}:{job}"));
        })
        .build()
        .unwrap();

    let res = tokio::time::timeout(Duration::from_secs(5), pipeline.run())
        .await
        .expect("run must not hang");

    match res {
        Err(RuntimeError::TaskPanicked { task, info }) => {
            assert!(task.starts_with("worker-"));
            assert_eq!(info, "cannot compute job 5");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_zero_concurrency_is_rejected() {
    let err = Pipeline::new(Config::new(0, 10)).err().unwrap();
    assert_eq!(err, ConfigError::InvalidConcurrency { concurrency: 0 });
    assert_eq!(err.as_label(), "config_invalid_concurrency");
}
