//! # Idle pool of worker slots.
//!
//! A [`WorkerSlot`] is a worker's identity plus its reusable assignment holder
//! and a handle to its private assignment channel. The [`IdlePool`] queues the
//! slots whose workers are ready for new work.
//!
//! ```text
//!            acquire()                       dispatch(job)
//! IdlePool ────────────► Dispatcher ── stamp ─────────────► worker inbox
//!    ▲                                                          │
//!    └───────────── release(slot) ◄──── Worker (after publish) ◄┘
//! ```
//!
//! ## Rules
//! - Capacity equals the number of workers and the pool starts full, so
//!   `release` never waits in practice.
//! - A slot is either queued here, travelling as an assignment, or held by its
//!   worker while the job is computed and published; never two at once.
//! - No ordering promise among idle slots: whichever worker released first is
//!   served first.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::mailbox::{Closed, Mailbox};
use crate::jobs::Assignment;

/// A worker ready to receive one assignment.
pub(crate) struct WorkerSlot {
    id: usize,
    assignment: Assignment,
    inbox: Arc<Mailbox<Assignment>>,
}

impl WorkerSlot {
    /// Creates a slot around a (reset) assignment holder.
    pub fn new(id: usize, assignment: Assignment, inbox: Arc<Mailbox<Assignment>>) -> Self {
        Self {
            id,
            assignment,
            inbox,
        }
    }

    /// Worker id.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Stamps the holder with `job` and moves it into the worker's inbox.
    pub async fn dispatch(self, job: u64, token: &CancellationToken) -> Result<(), Closed> {
        let WorkerSlot {
            mut assignment,
            inbox,
            ..
        } = self;
        assignment.stamp(job);
        inbox.send(assignment, token).await
    }
}

/// Bounded queue of idle worker slots.
pub(crate) struct IdlePool {
    slots: Mailbox<WorkerSlot>,
}

impl IdlePool {
    /// Creates a pool pre-filled with one slot per inbox (slot id = position).
    pub fn new(inboxes: &[Arc<Mailbox<Assignment>>]) -> Self {
        let slots = inboxes
            .iter()
            .enumerate()
            .map(|(id, inbox)| WorkerSlot::new(id, Assignment::default(), Arc::clone(inbox)));

        Self {
            slots: Mailbox::preloaded(inboxes.len(), slots),
        }
    }

    /// Waits for an idle slot.
    ///
    /// Returns `None` once the pool is closed or the run is cancelled.
    pub async fn acquire(&self, token: &CancellationToken) -> Option<WorkerSlot> {
        self.slots.recv(token).await.ok()
    }

    /// Puts a slot back at the end of the queue.
    pub async fn release(&self, slot: WorkerSlot, token: &CancellationToken) -> Result<(), Closed> {
        self.slots.send(slot, token).await
    }

    /// Closes the pool and drops the queued slots, returning how many there were.
    pub async fn close_and_drain(&self) -> u64 {
        self.slots.close_and_drain().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inboxes(n: usize) -> Vec<Arc<Mailbox<Assignment>>> {
        (0..n).map(|_| Arc::new(Mailbox::new(1))).collect()
    }

    #[tokio::test]
    async fn test_pool_starts_full_with_every_slot() {
        let token = CancellationToken::new();
        let pool = IdlePool::new(&inboxes(3));

        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(pool.acquire(&token).await.unwrap().id());
        }
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_dispatch_stamps_the_holder_into_the_slot_inbox() {
        let token = CancellationToken::new();
        let boxes = inboxes(2);
        let pool = IdlePool::new(&boxes);

        let slot = pool.acquire(&token).await.unwrap();
        let id = slot.id();
        slot.dispatch(41, &token).await.unwrap();

        let received = boxes[id].recv(&token).await.unwrap();
        assert_eq!(received.job(), 41);
    }

    #[tokio::test]
    async fn test_closed_pool_signals_acquire_and_release() {
        let token = CancellationToken::new();
        let boxes = inboxes(2);
        let pool = IdlePool::new(&boxes);

        let slot = pool.acquire(&token).await.unwrap();
        assert_eq!(pool.close_and_drain().await, 1);
        assert!(pool.acquire(&token).await.is_none());
        assert_eq!(pool.release(slot, &token).await, Err(Closed::Disconnected));
    }
}
