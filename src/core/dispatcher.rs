//! # Dispatcher: hands out the numbered jobs.
//!
//! For each job index `0..workload`, in increasing order, the dispatcher takes
//! one idle slot (waiting if none is free), stamps the slot's holder with the
//! index and moves it into that worker's inbox.
//!
//! Stops after `workload` sends, or as soon as the pool is closed or the run is
//! cancelled. Jobs are never skipped nor sent twice; the order in which they
//! complete is up to the workers.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::pool::IdlePool;
use crate::events::{Bus, Event, EventKind};

/// Task name used in events and error reports.
pub(crate) const DISPATCHER: &str = "dispatcher";

pub(crate) struct Dispatcher {
    pool: Arc<IdlePool>,
    workload: u64,
    bus: Bus,
}

impl Dispatcher {
    pub fn new(pool: Arc<IdlePool>, workload: u64, bus: Bus) -> Self {
        Self {
            pool,
            workload,
            bus,
        }
    }

    pub async fn run(self, token: CancellationToken) {
        let mut sent: u64 = 0;

        for job in 0..self.workload {
            let Some(slot) = self.pool.acquire(&token).await else {
                break;
            };
            let worker = slot.id();
            if slot.dispatch(job, &token).await.is_err() {
                break;
            }
            sent += 1;
            self.bus.publish(
                Event::new(EventKind::JobAssigned)
                    .with_worker(worker)
                    .with_job(job),
            );
        }

        self.bus.publish(
            Event::new(EventKind::DispatcherFinished)
                .with_task(DISPATCHER)
                .with_count(sent),
        );
    }
}
