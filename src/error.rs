//! Error types used by the pipeline runtime and the observer registry.
//!
//! - [`ConfigError`] rejects a configuration at construction.
//! - [`RuntimeError`] reports an abnormal end of [`Pipeline::run`](crate::Pipeline::run).
//! - [`ListenerError`] / [`PublishError`] cover listener callbacks of the
//!   [`ObserverRegistry`](crate::ObserverRegistry).
//!
//! Each enum offers `as_label` (stable snake_case label for logs/metrics).

use std::time::Duration;
use thiserror::Error;

/// # Errors raised while constructing a pipeline.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A pipeline needs at least one worker.
    #[error("invalid concurrency {concurrency}: at least one worker is required")]
    InvalidConcurrency {
        /// The rejected value.
        concurrency: usize,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fanpool::ConfigError;
    ///
    /// let err = ConfigError::InvalidConcurrency { concurrency: 0 };
    /// assert_eq!(err.as_label(), "config_invalid_concurrency");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::InvalidConcurrency { .. } => "config_invalid_concurrency",
        }
    }
}

/// # Errors produced by a pipeline run.
///
/// Both variants are reported only after the shutdown sequence has finished
/// closing and draining every channel.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Some tasks did not exit within the configured grace period.
    #[error("shutdown timeout {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Names of the tasks that were still running.
        stuck: Vec<String>,
    },

    /// A dispatcher or worker task panicked.
    #[error("task {task} panicked: {info}")]
    TaskPanicked {
        /// Name of the task, if it could be determined.
        task: String,
        /// Panic payload rendered as text.
        info: String,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fanpool::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), stuck: vec![] };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
            RuntimeError::TaskPanicked { .. } => "runtime_task_panicked",
        }
    }
}

/// Failure reported by a [`Listener`](crate::Listener) callback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ListenerError {
    message: String,
}

impl ListenerError {
    /// Creates an error carrying a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// # Errors returned by [`ObserverRegistry::publish`](crate::ObserverRegistry::publish).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// A listener failed and the registry stops at the first failure.
    #[error("listener {listener} failed: {source}")]
    ListenerFailed {
        /// Id of the failing listener.
        listener: i64,
        /// Number of listeners notified successfully before the failure.
        delivered: usize,
        /// The listener's error.
        #[source]
        source: ListenerError,
    },
}

impl PublishError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            PublishError::ListenerFailed { .. } => "publish_listener_failed",
        }
    }
}
