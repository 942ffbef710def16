//! # Mailbox: a bounded channel the orchestrator can close from outside.
//!
//! Every channel of the pipeline (idle pool, per-worker assignments, per-worker
//! returns, shared reviews) is a [`Mailbox`]. It keeps both ends of a bounded
//! [`tokio::sync::mpsc`] channel so that shutdown can close and drain it
//! regardless of which task is currently consuming it.
//!
//! ## Rules
//! - Every blocking operation races against the run's [`CancellationToken`],
//!   biased towards cancellation.
//! - After [`Mailbox::close_and_drain`], sends fail with [`Closed::Disconnected`]
//!   and receives return whatever was not drained (nothing), then `Disconnected`.
//! - A single consumer is expected at a time; the receiver lock is only
//!   contended during shutdown.

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

/// Why a mailbox operation did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Closed {
    /// The run's cancellation token fired first.
    Cancelled,
    /// The channel was closed.
    Disconnected,
}

/// Bounded channel with both ends owned together.
pub(crate) struct Mailbox<T> {
    tx: mpsc::Sender<T>,
    rx: Mutex<mpsc::Receiver<T>>,
}

impl<T: Send> Mailbox<T> {
    /// Creates an empty mailbox holding at most `capacity` items (min 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Creates a mailbox pre-filled with `items`.
    ///
    /// Items beyond the capacity are dropped; callers size the capacity to fit.
    pub fn preloaded(capacity: usize, items: impl IntoIterator<Item = T>) -> Self {
        let mailbox = Self::new(capacity);
        for item in items {
            if mailbox.tx.try_send(item).is_err() {
                break;
            }
        }
        mailbox
    }

    /// Sends an item, waiting for free capacity unless cancelled or closed.
    pub async fn send(&self, item: T, token: &CancellationToken) -> Result<(), Closed> {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(Closed::Cancelled),
            res = self.tx.send(item) => res.map_err(|_| Closed::Disconnected),
        }
    }

    /// Receives the next item unless cancelled or closed.
    pub async fn recv(&self, token: &CancellationToken) -> Result<T, Closed> {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(Closed::Cancelled),
            item = async { self.rx.lock().await.recv().await } => {
                item.ok_or(Closed::Disconnected)
            }
        }
    }

    /// Closes the channel and discards buffered items.
    ///
    /// Returns the number of discarded items. Call only after the run's token
    /// was cancelled, so that no consumer keeps the receiver locked.
    pub async fn close_and_drain(&self) -> u64 {
        let mut rx = self.rx.lock().await;
        rx.close();

        let mut drained = 0;
        while rx.try_recv().is_ok() {
            drained += 1;
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_preloaded_items_are_received_in_order() {
        let token = CancellationToken::new();
        let mb = Mailbox::preloaded(2, [1, 2, 3]);

        assert_eq!(mb.recv(&token).await, Ok(1));
        assert_eq!(mb.recv(&token).await, Ok(2));
        assert_eq!(mb.close_and_drain().await, 0);
    }

    #[tokio::test]
    async fn test_cancellation_releases_blocked_receiver() {
        let token = CancellationToken::new();
        let mb = std::sync::Arc::new(Mailbox::<u8>::new(1));

        let waiter = {
            let mb = mb.clone();
            let token = token.clone();
            tokio::spawn(async move { mb.recv(&token).await })
        };
        token.cancel();

        assert_eq!(waiter.await.unwrap(), Err(Closed::Cancelled));
    }

    #[tokio::test]
    async fn test_cancellation_releases_blocked_sender() {
        let token = CancellationToken::new();
        let mb = Mailbox::preloaded(1, [0u8]);

        let (res, ()) = tokio::join!(mb.send(1, &token), async { token.cancel() });
        assert_eq!(res, Err(Closed::Cancelled));
    }

    #[tokio::test]
    async fn test_send_after_close_fails_and_drain_counts() {
        let token = CancellationToken::new();
        let mb = Mailbox::preloaded(3, ["a", "b"]);

        assert_eq!(mb.close_and_drain().await, 2);
        assert_eq!(mb.send("c", &token).await, Err(Closed::Disconnected));
        assert_eq!(mb.recv(&token).await, Err(Closed::Disconnected));
    }
}
