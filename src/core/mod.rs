//! Runtime core: channels, tasks and orchestration.
//!
//! The only public API from this module is [`Pipeline`] (with its builder and
//! reports), which wires the tasks together and drives the ordered shutdown.
//!
//! Internal modules:
//! - [`mailbox`]: bounded channel closable from the orchestrator, cancellation-aware;
//! - [`pool`]: worker slots and the idle pool;
//! - [`dispatcher`]: hands out job indices to idle slots;
//! - [`worker`]: per-slot loop (return, assignment, compute, publish, release);
//! - [`reviewer`]: fan-in, review, buffer return, completion count;
//! - [`pipeline`]: construction, run, shutdown sequence.

mod builder;
mod dispatcher;
mod mailbox;
mod pipeline;
mod pool;
mod reviewer;
mod worker;

pub use builder::PipelineBuilder;
pub(crate) use mailbox::Mailbox;
pub use pipeline::{DrainReport, Pipeline, RunReport};
