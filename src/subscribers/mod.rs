//! # Event subscribers for the pipeline runtime.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`]
//! fan-out used to deliver events broadcast through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Worker/Dispatcher/Reviewer ── publish(Event) ──► Bus ──► listener ──► SubscriberSet
//!                                                                  ┌─────────┼─────────┐
//!                                                                  ▼         ▼         ▼
//!                                                              LogWriter  Metrics   Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use fanpool::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct ReviewCounter;
//!
//! #[async_trait]
//! impl Subscribe for ReviewCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::JobReviewed {
//!             // increment a counter
//!         }
//!     }
//!     fn name(&self) -> &'static str { "review-counter" }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub(crate) use set::panic_info;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
