//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the dispatcher, the workers and the
//! reviewer of a pipeline run.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Dispatcher`, `Worker`, `Reviewer`, `Pipeline` shutdown,
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the pipeline's subscriber listener (fans out to
//!   `SubscriberSet`), and raw receivers from `Pipeline::subscribe`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
