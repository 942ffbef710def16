//! # Listener capability and entry events.
//!
//! A [`Listener`] reacts to changes of an entry identified by an `i64` id.
//! [`EntryEvent`] says which entry changed and how ([`EntryKind`]).

use crate::error::ListenerError;

/// How an entry changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// The entry was created.
    Added,
    /// The entry was removed.
    Deleted,
    /// The entry was updated.
    Modified,
}

/// A change notification for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryEvent {
    /// Id of the changed entry; `0` means "no entry" and is never delivered.
    pub id: i64,
    /// What happened to it.
    pub kind: EntryKind,
}

impl EntryEvent {
    /// Creates an event.
    pub fn new(id: i64, kind: EntryKind) -> Self {
        Self { id, kind }
    }

    /// Shorthand for an [`EntryKind::Added`] event.
    pub fn added(id: i64) -> Self {
        Self::new(id, EntryKind::Added)
    }

    /// Shorthand for an [`EntryKind::Deleted`] event.
    pub fn deleted(id: i64) -> Self {
        Self::new(id, EntryKind::Deleted)
    }

    /// Shorthand for an [`EntryKind::Modified`] event.
    pub fn modified(id: i64) -> Self {
        Self::new(id, EntryKind::Modified)
    }
}

/// Contract for entry listeners.
///
/// Callbacks run on the publisher's thread, one listener after the other, and
/// should return quickly. A callback returning `Err` is reported back to the
/// publisher according to the registry's
/// [`FanoutPolicy`](crate::observers::FanoutPolicy).
pub trait Listener: Send + Sync + 'static {
    /// Registry key of this listener.
    fn id(&self) -> i64;

    /// Called for [`EntryKind::Added`].
    fn entry_added(&self, event: &EntryEvent) -> Result<(), ListenerError>;

    /// Called for [`EntryKind::Deleted`].
    fn entry_deleted(&self, event: &EntryEvent) -> Result<(), ListenerError>;

    /// Called for [`EntryKind::Modified`].
    fn entry_modified(&self, event: &EntryEvent) -> Result<(), ListenerError>;

    /// Routes `event` to the callback matching its kind.
    fn notify(&self, event: &EntryEvent) -> Result<(), ListenerError> {
        match event.kind {
            EntryKind::Added => self.entry_added(event),
            EntryKind::Deleted => self.entry_deleted(event),
            EntryKind::Modified => self.entry_modified(event),
        }
    }
}
