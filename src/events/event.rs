//! # Runtime events emitted by the pipeline tasks.
//!
//! The [`EventKind`] enum classifies events across four categories:
//! - **Dispatch events**: a job leaves the dispatcher
//! - **Worker events**: the steps of one worker iteration
//! - **Review events**: the reviewer approved a job
//! - **Shutdown events**: cancellation, channel draining, task exit
//!
//! The [`Event`] struct carries the optional metadata (worker id, job index,
//! task name, counters, reasons).
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Events published by one task reach every bus receiver in the
//! order they were published, so the per-worker step sequence can be read back
//! from a single receiver.
//!
//! ## Example
//! ```rust
//! use fanpool::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::JobPublished)
//!     .with_worker(3)
//!     .with_job(42)
//!     .with_reason("worker 3 finished job 42");
//!
//! assert_eq!(ev.kind, EventKind::JobPublished);
//! assert_eq!(ev.worker, Some(3));
//! assert_eq!(ev.job, Some(42));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Lifecycle events ===
    /// Dispatcher and workers are about to be started.
    ///
    /// Sets:
    /// - `count`: configured workload
    /// - `reason`: pool shape, e.g. `concurrency=4 workload=200`
    PipelineStarted,

    /// Dispatcher stamped a job and sent it to an idle worker.
    ///
    /// Sets:
    /// - `worker`: receiving worker
    /// - `job`: job index
    JobAssigned,

    /// Dispatcher stopped (all jobs sent, or cancelled).
    ///
    /// Sets:
    /// - `task`: `"dispatcher"`
    /// - `count`: jobs actually sent
    DispatcherFinished,

    /// Worker got its reusable outcome buffer back (iteration step 1).
    ///
    /// Sets:
    /// - `worker`: worker id
    ReturnReceived,

    /// Worker received an assignment (iteration step 2).
    ///
    /// Sets:
    /// - `worker`: worker id
    /// - `job`: job index
    AssignmentReceived,

    /// Worker sent a completion ticket to the reviewer (iteration step 4).
    ///
    /// Sets:
    /// - `worker`: worker id
    /// - `job`: job index
    JobPublished,

    /// Worker put its slot back into the idle pool (iteration step 5).
    ///
    /// Sets:
    /// - `worker`: worker id
    SlotReleased,

    /// Worker left its loop for good.
    ///
    /// Sets:
    /// - `task`: worker task name
    /// - `worker`: worker id
    /// - `count`: jobs completed by this worker
    WorkerExited,

    /// Reviewer approved a completed job.
    ///
    /// Sets:
    /// - `worker`: originating worker
    /// - `job`: job index
    /// - `count`: reviews still outstanding
    /// - `reason`: computed outcome text
    JobReviewed,

    // === Shutdown events ===
    /// All jobs were reviewed; cancellation is being broadcast.
    ///
    /// Sets:
    /// - `count`: jobs reviewed
    ShutdownRequested,

    /// A channel was closed and its buffered items discarded.
    ///
    /// Sets:
    /// - `task`: channel name (`idle-pool`, `assignments`, `reviews`, `returns`)
    /// - `count`: number of discarded items
    ChannelDrained,

    /// Every started task confirmed its exit.
    AllStopped,

    /// Grace period exceeded; some tasks did not exit in time.
    ///
    /// Sets:
    /// - `reason`: names of the stuck tasks
    GraceExceeded,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Worker slot id, if applicable.
    pub worker: Option<usize>,
    /// Job index, if applicable.
    pub job: Option<u64>,
    /// Generic counter (jobs sent, items drained, reviews left...).
    pub count: Option<u64>,
    /// Name of the task or channel, if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable detail (outcome text, panic info, overflow details).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker: None,
            job: None,
            count: None,
            task: None,
            reason: None,
        }
    }

    /// Attaches a worker id.
    #[inline]
    pub fn with_worker(mut self, worker: usize) -> Self {
        self.worker = Some(worker);
        self
    }

    /// Attaches a job index.
    #[inline]
    pub fn with_job(mut self, job: u64) -> Self {
        self.job = Some(job);
        self
    }

    /// Attaches a counter value.
    #[inline]
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Attaches a task (or channel) name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }

    /// Creates a channel drained event.
    #[inline]
    pub fn channel_drained(channel: &'static str, drained: u64) -> Self {
        Event::new(EventKind::ChannelDrained)
            .with_task(channel)
            .with_count(drained)
    }

    /// True for events describing one step of a worker iteration.
    #[inline]
    pub fn is_worker_step(&self) -> bool {
        matches!(
            self.kind,
            EventKind::ReturnReceived
                | EventKind::AssignmentReceived
                | EventKind::JobPublished
                | EventKind::SlotReleased
        )
    }
}
