//! Observer registry: in-process listeners notified of entry changes.
//!
//! Independent of the pipeline. A registry is an ordinary value: construct one
//! and pass it by reference to whatever needs to publish or subscribe.
//!
//! ## Contents
//! - [`Listener`] capability trait (`entry_added` / `entry_deleted` / `entry_modified`)
//! - [`EntryEvent`], [`EntryKind`] change notification
//! - [`ObserverRegistry`] register / unregister / publish
//! - [`FanoutPolicy`] stop at the first failing listener, or notify all

mod listener;
mod registry;

pub use listener::{EntryEvent, EntryKind, Listener};
pub use registry::{FanoutPolicy, ObserverRegistry, PublishReport};
