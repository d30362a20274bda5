//! Validated concurrency limit.

use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use super::SchedulerError;

/// Maximum number of tasks allowed in flight at once. Always at least 1.
///
/// Constructing one is the only validation step a batch performs, so a
/// rejected limit never reaches the admission loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ConcurrencyLimit(NonZeroUsize);

impl ConcurrencyLimit {
    /// Validate a limit.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidLimit` when `limit` is 0.
    pub fn new(limit: usize) -> Result<Self, SchedulerError> {
        NonZeroUsize::new(limit)
            .map(Self)
            .ok_or(SchedulerError::InvalidLimit(0))
    }

    /// One task at a time.
    #[must_use]
    pub const fn serial() -> Self {
        Self(NonZeroUsize::MIN)
    }

    /// One slot per available CPU.
    #[must_use]
    pub fn available_parallelism() -> Self {
        Self(NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN))
    }

    /// The limit as a plain count.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl From<NonZeroUsize> for ConcurrencyLimit {
    fn from(value: NonZeroUsize) -> Self {
        Self(value)
    }
}

impl TryFrom<usize> for ConcurrencyLimit {
    type Error = SchedulerError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for ConcurrencyLimit {
    type Error = SchedulerError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self)
            .ok_or(SchedulerError::InvalidLimit(value))
    }
}

impl From<ConcurrencyLimit> for i64 {
    fn from(value: ConcurrencyLimit) -> Self {
        Self::try_from(value.get()).unwrap_or(Self::MAX)
    }
}

impl fmt::Display for ConcurrencyLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
