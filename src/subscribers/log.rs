//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [pipeline-started] concurrency=4 workload=200
//! [assigned] worker=2 job=17
//! [reviewed] worker=2 job=17 left=182 "worker 2 finished job 17"
//! [worker-exited] worker=2 jobs=51
//! [drained] channel=idle-pool items=3
//! [all-stopped]
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;
use async_trait::async_trait;

/// Event writer subscriber.
///
/// Per-step worker events are only printed when built with [`LogWriter::verbose`].
#[derive(Default)]
pub struct LogWriter {
    verbose: bool,
}

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a [`LogWriter`] that also prints every worker step.
    #[must_use]
    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let worker = e.worker.unwrap_or_default();
        let job = e.job.unwrap_or_default();
        let count = e.count.unwrap_or_default();

        match e.kind {
            EventKind::PipelineStarted => {
                println!(
                    "[pipeline-started] {}",
                    e.reason.as_deref().unwrap_or_default()
                );
            }
            EventKind::JobAssigned => {
                println!("[assigned] worker={worker} job={job}");
            }
            EventKind::DispatcherFinished => {
                println!("[dispatcher-finished] sent={count}");
            }
            EventKind::ReturnReceived
            | EventKind::AssignmentReceived
            | EventKind::JobPublished
            | EventKind::SlotReleased => {
                if self.verbose {
                    println!("[step] {:?} worker={worker} job={:?}", e.kind, e.job);
                }
            }
            EventKind::WorkerExited => {
                println!("[worker-exited] worker={worker} jobs={count}");
            }
            EventKind::JobReviewed => {
                println!(
                    "[reviewed] worker={worker} job={job} left={count} {:?}",
                    e.reason.as_deref().unwrap_or_default()
                );
            }
            EventKind::ShutdownRequested => {
                println!("[shutdown-requested] reviewed={count}");
            }
            EventKind::ChannelDrained => {
                println!(
                    "[drained] channel={} items={count}",
                    e.task.as_deref().unwrap_or("unknown")
                );
            }
            EventKind::AllStopped => {
                println!("[all-stopped]");
            }
            EventKind::GraceExceeded => {
                println!(
                    "[grace-exceeded] stuck={}",
                    e.reason.as_deref().unwrap_or_default()
                );
            }
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] subscriber={:?} reason={:?}",
                    e.task, e.reason
                );
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] subscriber={} info={}",
                    e.task.as_deref().unwrap_or("unknown"),
                    e.reason.as_deref().unwrap_or("unknown"),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
