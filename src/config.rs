//! # Pipeline configuration.
//!
//! [`Config`] centralizes the settings of a single pipeline run: how many
//! workers share the load, how many jobs are dispatched, how large the event
//! bus ring buffer is, and how long shutdown may wait for tasks to exit.
//!
//! ## Sentinel values
//! - `grace = 0s` → wait for every task without a deadline
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use fanpool::Config;
//!
//! let mut cfg = Config::default();
//! cfg.concurrency = 2;
//! cfg.workload = 10;
//! cfg.grace = Duration::from_secs(5);
//!
//! assert!(cfg.validate().is_ok());
//! assert_eq!(cfg.grace_limit(), Some(Duration::from_secs(5)));
//! ```

use std::time::Duration;

use crate::error::ConfigError;

/// Configuration of a worker pipeline.
///
/// ## Field semantics
/// - `concurrency`: number of worker slots (`>= 1`, checked by [`Config::validate`])
/// - `workload`: number of jobs dispatched, numbered `0..workload`
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
/// - `grace`: upper bound on the final wait for task exit (`0s` = unbounded)
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of workers, each owning one slot with private channels.
    pub concurrency: usize,

    /// Total number of jobs handed out by the dispatcher.
    ///
    /// Need not be a multiple of `concurrency`.
    pub workload: u64,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Receivers lagging behind more than `bus_capacity` events observe
    /// `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Maximum time to wait for tasks to exit once shutdown started.
    ///
    /// - `Duration::ZERO` = wait as long as it takes
    /// - `> 0` = tasks still running after `grace` are reported as stuck
    pub grace: Duration,
}

impl Config {
    /// Creates a configuration with the given shape and defaults for the rest.
    pub fn new(concurrency: usize, workload: u64) -> Self {
        Self {
            concurrency,
            workload,
            ..Self::default()
        }
    }

    /// Checks the invariants a pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency {
                concurrency: self.concurrency,
            });
        }
        Ok(())
    }

    /// Returns the shutdown grace period as an `Option`.
    ///
    /// - `None` → no deadline
    /// - `Some(d)` → stuck tasks are reported after `d`
    #[inline]
    pub fn grace_limit(&self) -> Option<Duration> {
        if self.grace == Duration::ZERO {
            None
        } else {
            Some(self.grace)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `concurrency = 4`
    /// - `workload = 200`
    /// - `bus_capacity = 1024`
    /// - `grace = 0s` (no deadline)
    fn default() -> Self {
        Self {
            concurrency: 4,
            workload: 200,
            bus_capacity: 1024,
            grace: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let cfg = Config::new(0, 10);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidConcurrency { concurrency: 0 })
        ));
    }

    #[test]
    fn test_zero_workload_is_valid() {
        assert!(Config::new(1, 0).validate().is_ok());
    }

    #[test]
    fn test_sentinels() {
        let mut cfg = Config::default();
        assert_eq!(cfg.grace_limit(), None);

        cfg.bus_capacity = 0;
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
