//! # Example: classroom
//!
//! Four workers share 200 numbered jobs; a single reviewer checks every result
//! and hands the buffer back to the worker that produced it.
//!
//! Shows how to:
//! - Build a [`Pipeline`] with the built-in [`LogWriter`].
//! - Read the [`RunReport`](fanpool::RunReport) after the ordered shutdown.
//!
//! ## Flow
//! ```text
//! Pipeline::run()
//!     ├─► Dispatcher ── job 0..199 ──► worker inboxes
//!     ├─► Worker 0..3 ── ticket ──► reviews
//!     ├─► Reviewer ── outcome ──► returns[w]   (until 200 reviewed)
//!     └─► shutdown: cancel → drain channels → join → flush LogWriter
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example classroom --features logging
//! ```

use std::sync::Arc;

use fanpool::{Config, LogWriter, Pipeline, Subscribe};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config {
        bus_capacity: 4096,
        ..Config::new(4, 200)
    };
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];

    let pipeline = Pipeline::builder(cfg).with_subscribers(subs).build()?;
    let report = pipeline.run().await?;

    println!(
        "reviewed {} jobs; drained: idle={} assignments={} tickets={} outcomes={}",
        report.reviewed,
        report.drained.idle_slots,
        report.drained.assignments,
        report.drained.tickets,
        report.drained.outcomes,
    );
    Ok(())
}
