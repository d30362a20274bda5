//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by scheduler components.
///
/// Task failures are never reported here: a batch where every task failed
/// still completes with `Ok`. Only configuration problems and broken
/// scheduler plumbing surface as errors.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Concurrency limit below 1. Rejected before any task is started.
    #[error("invalid concurrency limit: {0} (must be at least 1)")]
    InvalidLimit(i64),
    /// Configuration could not be parsed or failed validation.
    #[error("config error: {0}")]
    Config(String),
    /// No worker thread could be started for the blocking driver.
    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(String),
    /// The completion channel ended while tasks were still in flight.
    #[error("completion channel closed with {in_flight} task(s) in flight")]
    CompletionChannelClosed {
        /// Tasks admitted but never reported as settled.
        in_flight: usize,
    },
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
