//! Builders to construct a scheduler from configuration.

use crate::config::SchedulerConfig;
use crate::core::{Readiness, Scheduler, SchedulerError};
use crate::infra::PollVec;

/// Build a scheduler from configuration, creating its readiness aggregator
/// through `readiness_factory`.
///
/// # Errors
///
/// [`SchedulerError::InvalidConfig`] when the configuration does not validate,
/// or whatever the factory returns.
pub fn build_scheduler<R, F>(
    cfg: &SchedulerConfig,
    readiness_factory: F,
) -> Result<Scheduler, SchedulerError>
where
    R: Readiness + 'static,
    F: FnOnce(&SchedulerConfig) -> Result<R, SchedulerError>,
{
    cfg.validate().map_err(SchedulerError::InvalidConfig)?;
    let readiness = readiness_factory(cfg)?;
    Ok(Scheduler::from_parts(cfg.clone(), Box::new(readiness)))
}

/// Step-by-step scheduler construction.
///
/// ```
/// use prometheus_stepwise::builders::SchedulerBuilder;
///
/// let sched = SchedulerBuilder::new()
///     .with_gc_interval_rounds(4)
///     .with_max_nesting_depth(16)
///     .build()
///     .unwrap();
/// assert_eq!(sched.config().gc_interval_rounds, 4);
/// ```
#[derive(Default)]
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    readiness: Option<Box<dyn Readiness>>,
}

impl SchedulerBuilder {
    /// Builder with default configuration and a [`PollVec`] aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Collect garbage every `rounds` rounds.
    #[must_use]
    pub const fn with_gc_interval_rounds(mut self, rounds: u32) -> Self {
        self.config.gc_interval_rounds = rounds;
        self
    }

    /// Refuse steps nested deeper than `depth`.
    #[must_use]
    pub const fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.config.max_nesting_depth = depth;
        self
    }

    /// Back-off in milliseconds after descriptor or buffer exhaustion.
    #[must_use]
    pub const fn with_resource_retry_ms(mut self, ms: u64) -> Self {
        self.config.resource_retry_ms = ms;
        self
    }

    /// Treat a full disk as fatal rather than retryable.
    #[must_use]
    pub const fn with_disk_full_fatal(mut self, fatal: bool) -> Self {
        self.config.disk_full_fatal = fatal;
        self
    }

    /// Use `readiness` instead of a [`PollVec`].
    #[must_use]
    pub fn with_readiness(mut self, readiness: impl Readiness + 'static) -> Self {
        self.readiness = Some(Box::new(readiness));
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::InvalidConfig`] when the configuration does not validate.
    pub fn build(self) -> Result<Scheduler, SchedulerError> {
        self.config.validate().map_err(SchedulerError::InvalidConfig)?;
        let readiness = self
            .readiness
            .unwrap_or_else(|| Box::new(PollVec::new()));
        Ok(Scheduler::from_parts(self.config, readiness))
    }
}

impl std::fmt::Debug for SchedulerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerBuilder")
            .field("config", &self.config)
            .field("custom_readiness", &self.readiness.is_some())
            .finish()
    }
}
