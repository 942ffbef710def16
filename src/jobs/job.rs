//! # Job records exchanged through the pipeline channels.
//!
//! - [`Assignment`]: the unit of work (a job index) sent by the dispatcher.
//! - [`Outcome`]: the reusable text buffer a worker fills with its result.
//! - [`CompletionTicket`]: an outcome on its way to the reviewer, together with
//!   the return channel that gets the buffer back once reviewed.
//!
//! All three are moved through channels; whoever holds one owns it exclusively.

use std::fmt;
use std::sync::Arc;

use crate::core::Mailbox;

/// Unit of work: the index of a job in `0..workload`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Assignment {
    job: u64,
}

impl Assignment {
    /// Returns the job index.
    #[inline]
    pub fn job(&self) -> u64 {
        self.job
    }

    /// Stamps the holder with a job index.
    #[inline]
    pub(crate) fn stamp(&mut self, job: u64) {
        self.job = job;
    }

    /// Clears the holder before it goes back to the idle pool.
    #[inline]
    pub(crate) fn reset(&mut self) {
        self.job = 0;
    }
}

/// Reusable result buffer.
///
/// One outcome exists per worker for the whole run; its allocation is reused
/// across jobs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Outcome {
    text: String,
}

impl Outcome {
    /// Returns the computed text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Clears the text, keeping the allocation, and hands out the buffer.
    #[inline]
    pub(crate) fn buffer(&mut self) -> &mut String {
        self.text.clear();
        &mut self.text
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A completed job waiting for review.
pub struct CompletionTicket {
    worker: usize,
    job: u64,
    outcome: Outcome,
    return_to: Arc<Mailbox<Outcome>>,
}

impl CompletionTicket {
    pub(crate) fn new(
        worker: usize,
        job: u64,
        outcome: Outcome,
        return_to: Arc<Mailbox<Outcome>>,
    ) -> Self {
        Self {
            worker,
            job,
            outcome,
            return_to,
        }
    }

    /// Id of the worker that completed the job.
    #[inline]
    pub fn worker(&self) -> usize {
        self.worker
    }

    /// Index of the completed job.
    #[inline]
    pub fn job(&self) -> u64 {
        self.job
    }

    /// The computed outcome.
    #[inline]
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Splits the ticket into the outcome buffer and its return channel.
    pub(crate) fn into_return(self) -> (Outcome, Arc<Mailbox<Outcome>>) {
        (self.outcome, self.return_to)
    }
}

impl fmt::Debug for CompletionTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionTicket")
            .field("worker", &self.worker)
            .field("job", &self.job)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}
