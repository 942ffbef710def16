//! # Pipeline: starts the tasks, reviews, and shuts everything down in order.
//!
//! The [`Pipeline`] owns every channel of a run, the event bus, and the
//! subscriber list. [`Pipeline::run`] consumes it: a pipeline is single-shot.
//!
//! ## High-level architecture
//! ```text
//!                  ┌──────────── IdlePool (cap = N, starts full) ◄──────────────┐
//!                  ▼                                                             │ 5. release
//!            Dispatcher ── job i ──► inbox[w] (cap 1) ──► Worker w ─────────────┤
//!                                                          ▲   │ 4. ticket       │
//!                                   returns[w] (cap 1) ────┘   ▼                 │
//!                                        ▲            reviews (cap N)            │
//!                                        │                     │                 │
//!                                        └──── outcome ◄── Reviewer (this task) ─┘
//! ```
//!
//! ## Shutdown path
//! Once the reviewer has counted `workload` reviews:
//! ```text
//! publish ShutdownRequested
//!   └─► runtime_token.cancel()            every blocked task wakes up
//!   └─► close + drain idle pool
//!   └─► close + drain every inbox
//!   └─► close + drain reviews
//!   └─► close + drain every returns channel
//!   └─► join dispatcher + workers (bounded by cfg.grace if set)
//!         ├─ all joined      → publish AllStopped
//!         └─ grace exceeded  → publish GraceExceeded, RuntimeError::GraceExceeded
//!   └─► flush subscribers
//! ```
//!
//! ## Example
//! ```rust
//! use fanpool::{Config, Pipeline};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Pipeline::new(Config::new(4, 20))?;
//!     let report = pipeline.run().await?;
//!
//!     assert_eq!(report.reviewed, 20);
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::{Id, JoinError, JoinHandle, JoinSet};
use tokio::time;
use tokio_util::sync::CancellationToken;

use super::builder::PipelineBuilder;
use super::dispatcher::{DISPATCHER, Dispatcher};
use super::mailbox::Mailbox;
use super::pool::IdlePool;
use super::reviewer::Reviewer;
use super::worker::{Worker, WorkerLinks};
use crate::subscribers::{Subscribe, SubscriberSet, panic_info};
use crate::{
    config::Config,
    error::{ConfigError, RuntimeError},
    events::{Bus, Event, EventKind},
    jobs::{Assignment, CompletionTicket, Compute, Outcome, Review},
};

/// Items discarded at each shutdown step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    /// Slots still queued in the idle pool.
    pub idle_slots: u64,
    /// Assignments sent but never picked up.
    pub assignments: u64,
    /// Completion tickets published but never reviewed.
    pub tickets: u64,
    /// Outcome buffers returned but never picked up again.
    pub outcomes: u64,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Number of reviewed jobs (equals the configured workload).
    pub reviewed: u64,
    /// What the shutdown sequence discarded.
    pub drained: DrainReport,
}

/// Fan-out/fan-in worker pipeline.
pub struct Pipeline {
    cfg: Config,
    bus: Bus,
    subscribers: Vec<Arc<dyn Subscribe>>,
    compute: Arc<dyn Compute>,
    review: Arc<dyn Review>,

    pool: Arc<IdlePool>,
    inboxes: Vec<Arc<Mailbox<Assignment>>>,
    returns: Vec<Arc<Mailbox<Outcome>>>,
    reviews: Arc<Mailbox<CompletionTicket>>,
}

impl Pipeline {
    /// Creates a pipeline with the default computation and review.
    ///
    /// Fails with [`ConfigError::InvalidConcurrency`] if `cfg.concurrency == 0`.
    pub fn new(cfg: Config) -> Result<Self, ConfigError> {
        Self::builder(cfg).build()
    }

    /// Returns a builder to plug subscribers, computation and review.
    pub fn builder(cfg: Config) -> PipelineBuilder {
        PipelineBuilder::new(cfg)
    }

    /// Allocates every channel; the idle pool and returns channels start full.
    pub(crate) fn new_internal(
        cfg: Config,
        subscribers: Vec<Arc<dyn Subscribe>>,
        compute: Arc<dyn Compute>,
        review: Arc<dyn Review>,
    ) -> Self {
        let n = cfg.concurrency;
        let inboxes: Vec<_> = (0..n).map(|_| Arc::new(Mailbox::new(1))).collect();
        let returns: Vec<_> = (0..n)
            .map(|_| Arc::new(Mailbox::preloaded(1, [Outcome::default()])))
            .collect();

        Self {
            bus: Bus::new(cfg.bus_capacity_clamped()),
            pool: Arc::new(IdlePool::new(&inboxes)),
            reviews: Arc::new(Mailbox::new(n)),
            inboxes,
            returns,
            subscribers,
            compute,
            review,
            cfg,
        }
    }

    /// The configuration this pipeline was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Creates a raw receiver of every event published from now on.
    ///
    /// Size `Config::bus_capacity` for the whole run if the receiver is only
    /// read after [`run`](Self::run) returns.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Runs the pipeline to completion.
    ///
    /// Starts the dispatcher and one task per worker, reviews exactly
    /// `workload` jobs, then closes and drains every channel and waits for all
    /// tasks to exit. Returns only once every started task is gone.
    pub async fn run(self) -> Result<RunReport, RuntimeError> {
        let listener_stop = CancellationToken::new();
        let listener = self.spawn_listener(listener_stop.clone());

        let token = CancellationToken::new();
        self.bus.publish(
            Event::new(EventKind::PipelineStarted)
                .with_count(self.cfg.workload)
                .with_reason(format!(
                    "concurrency={} workload={}",
                    self.cfg.concurrency, self.cfg.workload
                )),
        );

        let mut set = JoinSet::new();
        let mut names = self.spawn_tasks(&mut set, &token);

        let reviewer = Reviewer::new(
            Arc::clone(&self.reviews),
            Arc::clone(&self.review),
            self.bus.clone(),
        );
        let mut reviewed = 0;
        let failure = tokio::select! {
            biased;
            () = reviewer.run(self.cfg.workload, &token, &mut reviewed) => None,
            err = watch_panics(&mut set, &mut names) => Some(err),
        };

        self.bus
            .publish(Event::new(EventKind::ShutdownRequested).with_count(reviewed));
        token.cancel();
        let drained = self.close_channels().await;
        let res = self.wait_all(&mut set, names).await;

        listener_stop.cancel();
        let _ = listener.await;

        match failure {
            Some(err) => Err(err),
            None => res.map(|()| RunReport { reviewed, drained }),
        }
    }

    /// Forwards bus events to the subscriber set until stopped, then flushes it.
    fn spawn_listener(&self, stop: CancellationToken) -> JoinHandle<()> {
        let mut rx = self.bus.subscribe();
        let set = SubscriberSet::new(self.subscribers.clone(), self.bus.clone());

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    msg = rx.recv() => match msg {
                        Ok(ev) => set.emit(&ev),
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    _ = stop.cancelled() => {
                        loop {
                            match rx.try_recv() {
                                Ok(ev) => set.emit(&ev),
                                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                                Err(_) => break,
                            }
                        }
                        break;
                    }
                }
            }
            set.shutdown().await;
        })
    }

    /// Spawns the dispatcher and every worker; returns task names by task id.
    fn spawn_tasks(
        &self,
        set: &mut JoinSet<()>,
        token: &CancellationToken,
    ) -> HashMap<Id, String> {
        let mut names = HashMap::with_capacity(self.cfg.concurrency + 1);

        let dispatcher = Dispatcher::new(
            Arc::clone(&self.pool),
            self.cfg.workload,
            self.bus.clone(),
        );
        let handle = set.spawn(dispatcher.run(token.clone()));
        names.insert(handle.id(), DISPATCHER.to_string());

        for (id, (inbox, returns)) in self.inboxes.iter().zip(&self.returns).enumerate() {
            let links = WorkerLinks {
                inbox: Arc::clone(inbox),
                returns: Arc::clone(returns),
                reviews: Arc::clone(&self.reviews),
                pool: Arc::clone(&self.pool),
            };
            let worker = Worker::new(id, links, Arc::clone(&self.compute), self.bus.clone());
            let name = worker.name();
            let handle = set.spawn(worker.run(token.clone()));
            names.insert(handle.id(), name);
        }
        names
    }

    /// Closes and drains every channel, in dependency order.
    ///
    /// Must run after the runtime token was cancelled.
    async fn close_channels(&self) -> DrainReport {
        let mut report = DrainReport {
            idle_slots: self.pool.close_and_drain().await,
            ..DrainReport::default()
        };
        self.bus
            .publish(Event::channel_drained("idle-pool", report.idle_slots));

        for inbox in &self.inboxes {
            report.assignments += inbox.close_and_drain().await;
        }
        self.bus
            .publish(Event::channel_drained("assignments", report.assignments));

        report.tickets = self.reviews.close_and_drain().await;
        self.bus
            .publish(Event::channel_drained("reviews", report.tickets));

        for returns in &self.returns {
            report.outcomes += returns.close_and_drain().await;
        }
        self.bus
            .publish(Event::channel_drained("returns", report.outcomes));

        report
    }

    /// Joins every task, within [`Config::grace`] when one is set.
    ///
    /// A panicked task is reported as [`RuntimeError::TaskPanicked`] once all
    /// other tasks have been joined.
    async fn wait_all(
        &self,
        set: &mut JoinSet<()>,
        mut names: HashMap<Id, String>,
    ) -> Result<(), RuntimeError> {
        let mut panicked: Option<RuntimeError> = None;

        let joined = {
            let join_all = async {
                while let Some(res) = set.join_next_with_id().await {
                    if let Some(err) = record_exit(res, &mut names) {
                        panicked.get_or_insert(err);
                    }
                }
            };
            match self.cfg.grace_limit() {
                None => {
                    join_all.await;
                    true
                }
                Some(grace) => time::timeout(grace, join_all).await.is_ok(),
            }
        };

        if !joined {
            let mut stuck: Vec<String> = names.into_values().collect();
            stuck.sort_unstable();
            self.bus
                .publish(Event::new(EventKind::GraceExceeded).with_reason(stuck.join(",")));
            set.abort_all();
            return Err(RuntimeError::GraceExceeded {
                grace: self.cfg.grace,
                stuck,
            });
        }

        self.bus.publish(Event::new(EventKind::AllStopped));
        match panicked {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Joins tasks as they exit during the review phase.
///
/// Resolves with the first panic; stays pending while tasks exit normally.
async fn watch_panics(set: &mut JoinSet<()>, names: &mut HashMap<Id, String>) -> RuntimeError {
    while let Some(res) = set.join_next_with_id().await {
        if let Some(err) = record_exit(res, names) {
            return err;
        }
    }
    std::future::pending().await
}

/// Forgets an exited task; returns the panic it ended with, if any.
fn record_exit(
    res: Result<(Id, ()), JoinError>,
    names: &mut HashMap<Id, String>,
) -> Option<RuntimeError> {
    match res {
        Ok((id, ())) => {
            names.remove(&id);
            None
        }
        Err(err) => {
            let task = names.remove(&err.id()).unwrap_or_default();
            err.is_panic().then(|| RuntimeError::TaskPanicked {
                task,
                info: panic_info(&*err.into_panic()),
            })
        }
    }
}
