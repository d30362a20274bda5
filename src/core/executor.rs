//! Task factory and outcome abstractions.

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

/// Position of a task in the backlog. Admission order is index order.
pub type TaskIndex = usize;

/// How a task settled, as far as the scheduler cares.
///
/// Both variants free a slot identically; the distinction only feeds
/// observers, logs and the batch counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Settlement {
    /// Task finished successfully.
    Succeeded,
    /// Task failed with a reason.
    Failed(String),
}

impl Settlement {
    /// True for `Settlement::Failed`.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub(crate) fn dropped() -> Self {
        Self::Failed("task dropped before settling".into())
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Value a task settles with.
///
/// The scheduler never unwraps or forwards the value; it only asks whether
/// the task failed. Callers that need the value itself capture it inside the
/// task (a channel, a shared vector) before the task settles.
pub trait TaskOutcome {
    /// Classify this outcome.
    fn settlement(&self) -> Settlement;
}

impl TaskOutcome for () {
    fn settlement(&self) -> Settlement {
        Settlement::Succeeded
    }
}

impl<T, E> TaskOutcome for Result<T, E>
where
    E: fmt::Display,
{
    fn settlement(&self) -> Settlement {
        match self {
            Ok(_) => Settlement::Succeeded,
            Err(e) => Settlement::Failed(e.to_string()),
        }
    }
}

/// A deferred unit of asynchronous work.
///
/// `start` is called exactly once, at the moment the scheduler admits the
/// task. Any `FnOnce() -> impl Future` closure is a factory:
///
/// ```rust
/// use bounded_batch::core::TaskFactory;
///
/// fn assert_factory<F: TaskFactory>(_f: F) {}
///
/// assert_factory(|| async { Ok::<_, std::io::Error>(42) });
/// assert_factory(|| async {});
/// ```
pub trait TaskFactory {
    /// What the started task settles with.
    type Output: TaskOutcome;
    /// The running task.
    type Future: Future<Output = Self::Output>;

    /// Begin the task.
    fn start(self) -> Self::Future;
}

impl<F, Fut> TaskFactory for F
where
    F: FnOnce() -> Fut,
    Fut: Future,
    Fut::Output: TaskOutcome,
{
    type Output = Fut::Output;
    type Future = Fut;

    fn start(self) -> Self::Future {
        self()
    }
}
