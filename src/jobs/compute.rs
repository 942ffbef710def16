//! # Job computation.
//!
//! [`Compute`] turns `(worker id, job index)` into outcome text. The pipeline
//! calls it once per job, writing into the worker's reused buffer, so it must
//! be a pure function of its two inputs.
//!
//! Closures `Fn(usize, u64, &mut String)` implement [`Compute`] directly.
//!
//! ## Example
//! ```rust
//! use fanpool::{Compute, Describe};
//!
//! let mut out = String::new();
//! Describe.compute(1, 9, &mut out);
//! assert_eq!(out, "worker 1 finished job 9");
//!
//! let square = |_worker: usize, job: u64, out: &mut String| {
//!     use std::fmt::Write;
//!     let _ = write!(out, "{}", job * job);
//! };
//! let mut out = String::new();
//! square.compute(0, 12, &mut out);
//! assert_eq!(out, "144");
//! ```

use std::fmt::Write;

/// Deterministic job computation.
pub trait Compute: Send + Sync + 'static {
    /// Writes the outcome of `job` computed by `worker` into `out` (empty on entry).
    fn compute(&self, worker: usize, job: u64, out: &mut String);
}

impl<F> Compute for F
where
    F: Fn(usize, u64, &mut String) + Send + Sync + 'static,
{
    fn compute(&self, worker: usize, job: u64, out: &mut String) {
        self(worker, job, out)
    }
}

/// Default computation: a formatted description of who did which job.
#[derive(Debug, Default, Clone, Copy)]
pub struct Describe;

impl Compute for Describe {
    fn compute(&self, worker: usize, job: u64, out: &mut String) {
        // Writing into a String cannot fail.
        let _ = write!(out, "worker {worker} finished job {job}");
    }
}
