//! # Worker: one loop per slot.
//!
//! ## Iteration
//! ```text
//! loop {
//!   ├─► 1. recv outcome buffer from own returns   (closed/cancelled → exit)
//!   ├─► 2. recv assignment from own inbox          (closed/cancelled → exit)
//!   ├─► 3. compute(id, job) into the buffer
//!   ├─► 4. send CompletionTicket to the reviewer   (may wait: back-pressure)
//!   └─► 5. release slot (holder reset) to the idle pool
//! }
//! ```
//!
//! ## Rules
//! - Steps 1 and 2 strictly alternate, so a worker is never more than one job
//!   ahead of the reviewer.
//! - No retries: every wait ends with new data or with shutdown.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::mailbox::Mailbox;
use super::pool::{IdlePool, WorkerSlot};
use crate::events::{Bus, Event, EventKind};
use crate::jobs::{Assignment, CompletionTicket, Compute, Outcome};

/// Channels owned by (or shared with) one worker.
pub(crate) struct WorkerLinks {
    pub inbox: Arc<Mailbox<Assignment>>,
    pub returns: Arc<Mailbox<Outcome>>,
    pub reviews: Arc<Mailbox<CompletionTicket>>,
    pub pool: Arc<IdlePool>,
}

pub(crate) struct Worker {
    id: usize,
    links: WorkerLinks,
    compute: Arc<dyn Compute>,
    bus: Bus,
}

impl Worker {
    pub fn new(id: usize, links: WorkerLinks, compute: Arc<dyn Compute>, bus: Bus) -> Self {
        Self {
            id,
            links,
            compute,
            bus,
        }
    }

    /// Task name used in events and error reports.
    pub fn name(&self) -> String {
        format!("worker-{}", self.id)
    }

    pub async fn run(self, token: CancellationToken) {
        let completed = self.work(&token).await;

        self.bus.publish(
            Event::new(EventKind::WorkerExited)
                .with_task(self.name())
                .with_worker(self.id)
                .with_count(completed),
        );
    }

    /// Runs iterations until a channel closes or the run is cancelled.
    ///
    /// Returns the number of jobs published.
    async fn work(&self, token: &CancellationToken) -> u64 {
        let WorkerLinks {
            inbox,
            returns,
            reviews,
            pool,
        } = &self.links;
        let mut completed = 0;

        loop {
            let Ok(mut outcome) = returns.recv(token).await else {
                return completed;
            };
            self.step(EventKind::ReturnReceived, None);

            let Ok(mut assignment) = inbox.recv(token).await else {
                return completed;
            };
            let job = assignment.job();
            self.step(EventKind::AssignmentReceived, Some(job));

            self.compute.compute(self.id, job, outcome.buffer());

            let ticket = CompletionTicket::new(self.id, job, outcome, Arc::clone(returns));
            if reviews.send(ticket, token).await.is_err() {
                return completed;
            }
            completed += 1;
            self.step(EventKind::JobPublished, Some(job));

            assignment.reset();
            let slot = WorkerSlot::new(self.id, assignment, Arc::clone(inbox));
            if pool.release(slot, token).await.is_err() {
                return completed;
            }
            self.step(EventKind::SlotReleased, None);
        }
    }

    fn step(&self, kind: EventKind, job: Option<u64>) {
        let ev = Event::new(kind).with_worker(self.id);
        self.bus.publish(match job {
            Some(job) => ev.with_job(job),
            None => ev,
        });
    }
}
