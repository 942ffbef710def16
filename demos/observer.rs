//! # Example: observer
//!
//! Registers a few entry listeners and publishes events under both fan-out
//! policies.
//!
//! Shows how to:
//! - Implement [`Listener`].
//! - Handle a failing listener with [`FanoutPolicy::StopOnError`] (default).
//! - Collect failures with [`FanoutPolicy::ContinueOnError`].
//!
//! ## Run
//! ```bash
//! cargo run --example observer
//! ```

use std::sync::Arc;

use fanpool::{EntryEvent, FanoutPolicy, Listener, ListenerError, ObserverRegistry};

/// Prints every entry change.
struct Printer(i64);

impl Listener for Printer {
    fn id(&self) -> i64 {
        self.0
    }
    fn entry_added(&self, ev: &EntryEvent) -> Result<(), ListenerError> {
        println!("[listener {}] added entry {}", self.0, ev.id);
        Ok(())
    }
    fn entry_deleted(&self, ev: &EntryEvent) -> Result<(), ListenerError> {
        println!("[listener {}] deleted entry {}", self.0, ev.id);
        Ok(())
    }
    fn entry_modified(&self, ev: &EntryEvent) -> Result<(), ListenerError> {
        println!("[listener {}] modified entry {}", self.0, ev.id);
        Ok(())
    }
}

/// Refuses modifications.
struct ReadOnly(i64);

impl Listener for ReadOnly {
    fn id(&self) -> i64 {
        self.0
    }
    fn entry_added(&self, _: &EntryEvent) -> Result<(), ListenerError> {
        Ok(())
    }
    fn entry_deleted(&self, _: &EntryEvent) -> Result<(), ListenerError> {
        Ok(())
    }
    fn entry_modified(&self, ev: &EntryEvent) -> Result<(), ListenerError> {
        Err(ListenerError::new(format!("entry {} is read-only", ev.id)))
    }
}

fn fill(registry: &ObserverRegistry) {
    registry.register(Arc::new(Printer(1)));
    registry.register(Arc::new(ReadOnly(2)));
    registry.register(Arc::new(Printer(3)));
}

fn main() {
    let strict = ObserverRegistry::new();
    fill(&strict);

    for ev in [EntryEvent::added(7), EntryEvent::modified(7), EntryEvent::deleted(7)] {
        match strict.publish(&ev) {
            Ok(report) => println!("[strict] {:?} delivered={}", ev.kind, report.delivered),
            Err(err) => println!("[strict] {:?} stopped: {err} ({})", ev.kind, err.as_label()),
        }
    }

    let lenient = ObserverRegistry::with_policy(FanoutPolicy::ContinueOnError);
    fill(&lenient);

    if let Ok(report) = lenient.publish(&EntryEvent::modified(7)) {
        println!("[lenient] delivered={}", report.delivered);
        for (id, err) in &report.failures {
            println!("[lenient] listener {id} failed: {err}");
        }
    }

    // Id 0 means "no entry" and is never fanned out.
    if let Ok(report) = lenient.publish(&EntryEvent::added(0)) {
        println!("[lenient] id 0 delivered={}", report.delivered);
    }
}
