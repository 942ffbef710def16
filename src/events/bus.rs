//! # Event bus for broadcasting runtime events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from every pipeline task.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                 Receivers:
//!   Dispatcher ──┐
//!   Worker 0..N ─┼──────► Bus ───────► subscriber listener ──► SubscriberSet
//!   Reviewer   ──┘  (broadcast chan) └─► Pipeline::subscribe() (raw receivers)
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks and never applies
//!   back-pressure to the pipeline.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no active receivers at send time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events.
///
/// Cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers, the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_receiver_sees_events_in_publish_order() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(Event::new(EventKind::JobAssigned).with_job(1));
        bus.publish(Event::new(EventKind::JobAssigned).with_job(2));

        assert_eq!(rx.recv().await.unwrap().job, Some(1));
        assert_eq!(rx.recv().await.unwrap().job, Some(2));
    }

    #[test]
    fn test_publish_without_receivers_is_noop() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::AllStopped));
    }
}
