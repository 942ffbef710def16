use std::sync::Arc;

use super::pipeline::Pipeline;
use crate::{
    config::Config,
    error::ConfigError,
    jobs::{Approve, Compute, Describe, Review},
    subscribers::Subscribe,
};

/// Builder for constructing a [`Pipeline`] with custom behavior.
pub struct PipelineBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    compute: Arc<dyn Compute>,
    review: Arc<dyn Review>,
}

impl PipelineBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            compute: Arc::new(Describe),
            review: Arc::new(Approve),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events through dedicated workers with
    /// bounded queues; they are flushed before `run` returns.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Sets the per-job computation (default: [`Describe`]).
    pub fn with_compute(mut self, compute: impl Compute) -> Self {
        self.compute = Arc::new(compute);
        self
    }

    /// Sets the review applied to every completed job (default: [`Approve`]).
    ///
    /// Takes an `Arc` so callers can keep a handle to a stateful reviewer.
    pub fn with_review(mut self, review: Arc<dyn Review>) -> Self {
        self.review = review;
        self
    }

    /// Validates the configuration and allocates the pipeline channels.
    pub fn build(self) -> Result<Pipeline, ConfigError> {
        self.cfg.validate()?;
        Ok(Pipeline::new_internal(
            self.cfg,
            self.subscribers,
            self.compute,
            self.review,
        ))
    }
}
