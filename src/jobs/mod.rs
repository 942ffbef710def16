//! Job records and the pluggable per-job behavior.
//!
//! ## Contents
//! - [`Assignment`], [`Outcome`], [`CompletionTicket`] records moved through channels
//! - [`Compute`] (+ [`Describe`]) what a worker does with an assignment
//! - [`Review`] (+ [`Approve`]) what the reviewer does with a completed job

mod compute;
mod job;
mod review;

pub use compute::{Compute, Describe};
pub use job::{Assignment, CompletionTicket, Outcome};
pub use review::{Approve, Review};
