//! Builders to construct schedulers from configuration.

use std::sync::Arc;

use crate::config::SchedulerConfig;
use crate::core::{
    AuditObserver, AuditSink, BoundedScheduler, ConcurrencyLimit, SchedulerError, SettleObserver,
    Spawn,
};

/// Build a scheduler from configuration on the given spawner.
///
/// Returns the scheduler together with the validated limit from the
/// config, ready to pass to [`BoundedScheduler::run_with_limit`].
///
/// # Errors
///
/// `SchedulerError::Config` if the configuration is invalid.
pub fn build_scheduler<S: Spawn>(
    cfg: &SchedulerConfig,
    spawner: S,
) -> Result<(BoundedScheduler<S>, ConcurrencyLimit), SchedulerError> {
    SchedulerBuilder::from_config(cfg.clone()).build(spawner)
}

/// Step-by-step scheduler construction.
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    observers: Vec<Arc<dyn SettleObserver>>,
}

impl SchedulerBuilder {
    /// Start from default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(SchedulerConfig::default())
    }

    /// Start from an existing configuration.
    #[must_use]
    pub const fn from_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Set the scheduler name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the concurrency limit. Validated in [`build`](Self::build).
    #[must_use]
    pub const fn max_concurrency(mut self, limit: i64) -> Self {
        self.config.max_concurrency = limit;
        self
    }

    /// Enable or disable `warn` logs for failed tasks.
    #[must_use]
    pub const fn log_settlements(mut self, enabled: bool) -> Self {
        self.config.log_settlements = enabled;
        self
    }

    /// Attach a settlement observer.
    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn SettleObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Record admissions and settlements into `sink`. The returned handle
    /// gives access to the sink after batches have run.
    #[must_use]
    pub fn audit<A>(self, sink: A) -> (Self, Arc<AuditObserver<A>>)
    where
        A: AuditSink + 'static,
    {
        let observer = Arc::new(AuditObserver::new(self.config.name.clone(), sink));
        let builder = self.observer(Arc::clone(&observer) as Arc<dyn SettleObserver>);
        (builder, observer)
    }

    /// Validate the configuration and assemble the scheduler.
    ///
    /// # Errors
    ///
    /// `SchedulerError::Config` if the configuration is invalid.
    pub fn build<S: Spawn>(
        self,
        spawner: S,
    ) -> Result<(BoundedScheduler<S>, ConcurrencyLimit), SchedulerError> {
        self.config
            .validate()
            .map_err(|e| SchedulerError::Config(format!("config invalid: {e}")))?;
        let limit = self.config.limit().map_err(SchedulerError::Config)?;

        let scheduler = self.observers.into_iter().fold(
            BoundedScheduler::new(spawner)
                .with_name(self.config.name)
                .with_log_settlements(self.config.log_settlements),
            BoundedScheduler::with_observer,
        );
        tracing::debug!(name = scheduler.name(), %limit, "scheduler built");
        Ok((scheduler, limit))
    }
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
