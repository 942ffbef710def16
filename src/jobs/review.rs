//! # Review of completed jobs.
//!
//! [`Review`] is the side effect the reviewer applies to every
//! [`CompletionTicket`] before handing the outcome buffer back to its worker.
//! The default, [`Approve`], accepts everything; the `JobReviewed` event
//! published afterwards carries the outcome text for subscribers.

use async_trait::async_trait;

use super::CompletionTicket;

/// Contract for reviewing completed jobs.
///
/// Called sequentially from the reviewer, in ticket arrival order. A slow
/// review slows the whole pipeline: workers block on publishing once the
/// review channel is full.
#[async_trait]
pub trait Review: Send + Sync + 'static {
    /// Inspect one completed job.
    async fn review(&self, ticket: &CompletionTicket);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Accepts every job without further checks.
#[derive(Debug, Default, Clone, Copy)]
pub struct Approve;

#[async_trait]
impl Review for Approve {
    async fn review(&self, _ticket: &CompletionTicket) {}

    fn name(&self) -> &'static str {
        "approve"
    }
}
