//! # Reviewer: the fan-in side of the pipeline.
//!
//! Receives [`CompletionTicket`]s in arrival order, applies the configured
//! [`Review`], hands the outcome buffer back to the originating worker and
//! counts down the outstanding jobs. Returns once the count reaches zero; the
//! pipeline then starts shutdown.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::mailbox::Mailbox;
use crate::events::{Bus, Event, EventKind};
use crate::jobs::{CompletionTicket, Review};

pub(crate) struct Reviewer {
    reviews: Arc<Mailbox<CompletionTicket>>,
    review: Arc<dyn Review>,
    bus: Bus,
}

impl Reviewer {
    pub fn new(
        reviews: Arc<Mailbox<CompletionTicket>>,
        review: Arc<dyn Review>,
        bus: Bus,
    ) -> Self {
        Self {
            reviews,
            review,
            bus,
        }
    }

    /// Reviews exactly `workload` tickets, unless the run is cancelled first.
    ///
    /// `reviewed` is kept up to date so the count survives if this future is
    /// dropped early.
    pub async fn run(&self, workload: u64, token: &CancellationToken, reviewed: &mut u64) {
        let mut remaining = workload;

        while remaining > 0 {
            let Ok(ticket) = self.reviews.recv(token).await else {
                break;
            };
            self.review.review(&ticket).await;

            let (worker, job) = (ticket.worker(), ticket.job());
            let text: Arc<str> = Arc::from(ticket.outcome().text());
            let (outcome, return_to) = ticket.into_return();
            if return_to.send(outcome, token).await.is_err() {
                break;
            }

            remaining -= 1;
            *reviewed += 1;
            self.bus.publish(
                Event::new(EventKind::JobReviewed)
                    .with_worker(worker)
                    .with_job(job)
                    .with_count(remaining)
                    .with_reason(text),
            );
        }
    }
}
