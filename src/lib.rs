//! # fanpool
//!
//! **fanpool** is a small channel-based fan-out/fan-in worker pool for tokio.
//!
//! A dispatcher hands numbered jobs to a fixed set of workers, each worker
//! computes a result and publishes it for review, and a reviewer hands every
//! result buffer back to its worker. When all jobs are reviewed the pipeline
//! cancels every task, closes and drains each channel in a fixed order, and
//! waits for all tasks to exit.
//!
//! The crate also ships a small [`ObserverRegistry`]: explicitly constructed,
//! listeners keyed by id, synchronous fan-out with a configurable
//! [`FanoutPolicy`].
//!
//! ## Architecture
//! ### Overview
//! ```text
//!      ┌───────────────┐   acquire    ┌──────────────┐
//!      │   IdlePool    │─────────────►│  Dispatcher  │  jobs 0..workload, in order
//!      │ (cap = N)     │              └──────┬───────┘
//!      └───────▲───────┘                     │ assignment (inbox, cap 1)
//!              │ release                     ▼
//!      ┌───────┴───────┐   ┌──────────────┐   ┌──────────────┐
//!      │   Worker 0    │   │   Worker 1   │   │   Worker N   │
//!      └───────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!              │ ticket           │                  │
//!              ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │                 reviews channel (cap = N)                     │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                ▼
//!                     ┌────────────────────┐
//!                     │  Reviewer (run())  │── outcome buffer ──► returns[w] (cap 1)
//!                     └────────────────────┘
//! ```
//!
//! ### Worker iteration
//! ```text
//! loop {
//!   ├─► recv outcome buffer (returns[w])   ── closed/cancelled ─► exit
//!   ├─► recv assignment (inbox[w])         ── closed/cancelled ─► exit
//!   ├─► compute(w, job) into the buffer
//!   ├─► send CompletionTicket (reviews)    ── may wait: the only back-pressure
//!   └─► release slot to the IdlePool
//! }
//! ```
//!
//! ### Shutdown
//! ```text
//! reviewed == workload
//!   ├─► cancel runtime token
//!   ├─► close + drain: idle pool → inboxes → reviews → returns
//!   └─► join dispatcher + workers (optionally bounded by Config::grace)
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                         |
//! |-------------------|----------------------------------------------------------|--------------------------------------------|
//! | **Pipeline**      | Fan-out/fan-in run with ordered shutdown.                | [`Pipeline`], [`PipelineBuilder`]          |
//! | **Jobs**          | Pluggable per-job computation and review.                | [`Compute`], [`Review`]                    |
//! | **Subscriber API**| Observe every step of a run (logging, metrics, tests).   | [`Subscribe`], [`Event`], [`EventKind`]    |
//! | **Observers**     | Entry listeners with configurable failure policy.        | [`ObserverRegistry`], [`Listener`]         |
//! | **Errors**        | Typed errors for configuration, runs and listeners.      | [`ConfigError`], [`RuntimeError`]          |
//! | **Configuration** | Centralize run settings.                                 | [`Config`]                                 |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use fanpool::{Config, Pipeline};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn fanpool::Subscribe>> = vec![Arc::new(fanpool::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn fanpool::Subscribe>> = Vec::new();
//!
//!     let pipeline = Pipeline::builder(Config::new(4, 12))
//!         .with_subscribers(subs)
//!         .with_compute(|worker: usize, job: u64, out: &mut String| {
//!             out.push_str(&format!("{worker}:{job}"));
//!         })
//!         .build()?;
//!
//!     let report = pipeline.run().await?;
//!     assert_eq!(report.reviewed, 12);
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod jobs;
mod observers;
mod subscribers;

// ---- Public re-exports ----

pub use config::Config;
pub use core::{DrainReport, Pipeline, PipelineBuilder, RunReport};
pub use error::{ConfigError, ListenerError, PublishError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use jobs::{Approve, Assignment, CompletionTicket, Compute, Describe, Outcome, Review};
pub use observers::{
    EntryEvent, EntryKind, FanoutPolicy, Listener, ObserverRegistry, PublishReport,
};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
