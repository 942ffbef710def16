//! # ObserverRegistry: explicit listener registry with synchronous fan-out.
//!
//! Listeners are kept in a single `RwLock<BTreeMap<id, Arc<dyn Listener>>>`.
//! `publish` snapshots the handles under the read lock and notifies them after
//! releasing it, so a callback may itself register or unregister listeners.
//!
//! ## Fan-out
//! ```text
//! publish(event)
//!     │ id == 0 → ignored
//!     ├──► listener 1.notify(event) ── Ok
//!     ├──► listener 2.notify(event) ── Err ─┬─ StopOnError     → return Err(ListenerFailed)
//!     │                                     └─ ContinueOnError → record, go on
//!     └──► listener N.notify(event)
//! ```
//!
//! Listeners are notified in ascending id order.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use fanpool::{EntryEvent, Listener, ListenerError, ObserverRegistry};
//!
//! struct Audit(i64);
//!
//! impl Listener for Audit {
//!     fn id(&self) -> i64 { self.0 }
//!     fn entry_added(&self, _: &EntryEvent) -> Result<(), ListenerError> { Ok(()) }
//!     fn entry_deleted(&self, _: &EntryEvent) -> Result<(), ListenerError> {
//!         Err(ListenerError::new("deletes are not audited"))
//!     }
//!     fn entry_modified(&self, _: &EntryEvent) -> Result<(), ListenerError> { Ok(()) }
//! }
//!
//! let registry = ObserverRegistry::new();
//! registry.register(Arc::new(Audit(1)));
//! registry.register(Arc::new(Audit(2)));
//!
//! let report = registry.publish(&EntryEvent::added(42)).unwrap();
//! assert_eq!(report.delivered, 2);
//!
//! let err = registry.publish(&EntryEvent::deleted(42)).unwrap_err();
//! assert_eq!(err.as_label(), "publish_listener_failed");
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::listener::{EntryEvent, Listener};
use crate::error::{ListenerError, PublishError};

/// What `publish` does when a listener fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FanoutPolicy {
    /// Stop at the first failing listener and report it.
    #[default]
    StopOnError,
    /// Notify every listener and collect the failures.
    ContinueOnError,
}

/// Result of a successful `publish`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Listeners whose callback returned `Ok`.
    pub delivered: usize,
    /// Failures collected under [`FanoutPolicy::ContinueOnError`], by listener id.
    pub failures: Vec<(i64, ListenerError)>,
}

impl PublishReport {
    /// True if no listener failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Registry of entry listeners.
pub struct ObserverRegistry {
    listeners: RwLock<BTreeMap<i64, Arc<dyn Listener>>>,
    policy: FanoutPolicy,
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObserverRegistry {
    /// Creates an empty registry with [`FanoutPolicy::StopOnError`].
    pub fn new() -> Self {
        Self::with_policy(FanoutPolicy::default())
    }

    /// Creates an empty registry with the given failure policy.
    pub fn with_policy(policy: FanoutPolicy) -> Self {
        Self {
            listeners: RwLock::new(BTreeMap::new()),
            policy,
        }
    }

    /// The failure policy of this registry.
    pub fn policy(&self) -> FanoutPolicy {
        self.policy
    }

    /// Registers `listener` under its id.
    ///
    /// Returns the listener previously registered with the same id, if any.
    pub fn register(&self, listener: Arc<dyn Listener>) -> Option<Arc<dyn Listener>> {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(listener.id(), listener)
    }

    /// Removes the listener registered under `id`.
    pub fn unregister(&self, id: i64) -> Option<Arc<dyn Listener>> {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
    }

    /// True if a listener is registered under `id`.
    pub fn contains(&self, id: i64) -> bool {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id)
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `event` to every listener's matching callback.
    ///
    /// Events with `id == 0` are ignored (empty report). Under
    /// [`FanoutPolicy::StopOnError`] the first failure ends the fan-out and is
    /// returned as [`PublishError::ListenerFailed`]; under
    /// [`FanoutPolicy::ContinueOnError`] failures are collected in the report.
    pub fn publish(&self, event: &EntryEvent) -> Result<PublishReport, PublishError> {
        let mut report = PublishReport::default();
        if event.id == 0 {
            return Ok(report);
        }

        let snapshot: Vec<Arc<dyn Listener>> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        for listener in snapshot {
            match listener.notify(event) {
                Ok(()) => report.delivered += 1,
                Err(source) => match self.policy {
                    FanoutPolicy::StopOnError => {
                        return Err(PublishError::ListenerFailed {
                            listener: listener.id(),
                            delivered: report.delivered,
                            source,
                        });
                    }
                    FanoutPolicy::ContinueOnError => {
                        report.failures.push((listener.id(), source));
                    }
                },
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observers::EntryKind;
    use std::sync::Mutex;

    /// Records every callback; fails on the configured kind.
    struct Probe {
        id: i64,
        fail_on: Option<EntryKind>,
        seen: Arc<Mutex<Vec<(i64, EntryKind)>>>,
    }

    impl Probe {
        fn handle(&self, event: &EntryEvent) -> Result<(), ListenerError> {
            self.seen.lock().unwrap().push((self.id, event.kind));
            if self.fail_on == Some(event.kind) {
                return Err(ListenerError::new(format!("probe {} refused", self.id)));
            }
            Ok(())
        }
    }

    impl Listener for Probe {
        fn id(&self) -> i64 {
            self.id
        }
        fn entry_added(&self, event: &EntryEvent) -> Result<(), ListenerError> {
            self.handle(event)
        }
        fn entry_deleted(&self, event: &EntryEvent) -> Result<(), ListenerError> {
            self.handle(event)
        }
        fn entry_modified(&self, event: &EntryEvent) -> Result<(), ListenerError> {
            self.handle(event)
        }
    }

    fn setup(policy: FanoutPolicy) -> (ObserverRegistry, Arc<Mutex<Vec<(i64, EntryKind)>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = ObserverRegistry::with_policy(policy);
        for (id, fail_on) in [(3, None), (1, None), (2, Some(EntryKind::Deleted))] {
            registry.register(Arc::new(Probe {
                id,
                fail_on,
                seen: seen.clone(),
            }));
        }
        (registry, seen)
    }

    #[test]
    fn test_fanout_reaches_every_listener_in_id_order() {
        let (registry, seen) = setup(FanoutPolicy::StopOnError);

        let report = registry.publish(&EntryEvent::modified(7)).unwrap();
        assert_eq!(report.delivered, 3);
        assert!(report.is_clean());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (1, EntryKind::Modified),
                (2, EntryKind::Modified),
                (3, EntryKind::Modified)
            ]
        );
    }

    #[test]
    fn test_stop_on_error_halts_at_first_failure() {
        let (registry, seen) = setup(FanoutPolicy::StopOnError);

        let err = registry.publish(&EntryEvent::deleted(7)).unwrap_err();
        match err {
            PublishError::ListenerFailed {
                listener,
                delivered,
                ..
            } => {
                assert_eq!(listener, 2);
                assert_eq!(delivered, 1);
            }
        }
        // listener 3 was never called
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_continue_on_error_notifies_everyone() {
        let (registry, seen) = setup(FanoutPolicy::ContinueOnError);

        let report = registry.publish(&EntryEvent::deleted(7)).unwrap();
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, 2);
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_zero_id_is_ignored() {
        let (registry, seen) = setup(FanoutPolicy::StopOnError);

        let report = registry.publish(&EntryEvent::deleted(0)).unwrap();
        assert_eq!(report, PublishReport::default());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_register_replaces_and_unregister_removes() {
        let (registry, seen) = setup(FanoutPolicy::StopOnError);
        assert_eq!(registry.len(), 3);

        let previous = registry.register(Arc::new(Probe {
            id: 2,
            fail_on: None,
            seen: seen.clone(),
        }));
        assert!(previous.is_some());
        assert_eq!(registry.len(), 3);
        assert!(registry.publish(&EntryEvent::deleted(7)).is_ok());

        assert!(registry.unregister(2).is_some());
        assert!(registry.unregister(2).is_none());
        assert!(!registry.contains(2));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registries_are_isolated() {
        let (a, _) = setup(FanoutPolicy::StopOnError);
        let b = ObserverRegistry::new();
        assert!(b.is_empty());
        assert_eq!(b.publish(&EntryEvent::added(1)).unwrap().delivered, 0);
        assert_eq!(a.len(), 3);
    }
}
