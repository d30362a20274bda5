//! Bounded scheduler over a runtime-provided spawner.
//!
//! The coordinator is the future returned by [`BoundedScheduler::run`]. It
//! invokes factories in backlog order, hands each started task to the
//! spawner, and suspends on a completion channel whenever the in-flight set
//! is full. Every settled task sends its index on that channel, so waiting
//! for "whichever task finishes first" is a single `next().await` and the
//! in-flight set never has to be raced or polled.

use std::future::Future;
use std::sync::Arc;

use futures::channel::mpsc;
use futures::future::{self, Either};
use futures::StreamExt;
use tracing::Instrument;

use crate::core::admission::Admission;
use crate::core::settle::SettleGuard;
use crate::core::{
    BatchSummary, ConcurrencyLimit, SchedulerError, SettleObserver, Settlement, TaskFactory,
    TaskIndex, TaskOutcome,
};

/// Abstraction for spawning task execution on a runtime.
pub trait Spawn {
    /// Spawn an async task that returns a future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Runs batches of task factories with at most `limit` tasks in flight.
///
/// A scheduler is reusable: each call to [`run`](Self::run) is an
/// independent batch with its own backlog and in-flight set.
///
/// ```rust,ignore
/// use bounded_batch::core::BoundedScheduler;
/// use bounded_batch::runtime::TokioSpawner;
///
/// let scheduler = BoundedScheduler::new(TokioSpawner::current());
/// let tasks = (0..7).map(|i| move || async move {
///     tokio::time::sleep(std::time::Duration::from_millis(10 * i)).await;
///     Ok::<_, std::io::Error>(i)
/// });
/// let summary = scheduler.run(tasks, 3).await?;
/// assert_eq!(summary.admitted, 7);
/// ```
pub struct BoundedScheduler<S> {
    spawner: S,
    name: String,
    log_settlements: bool,
    observers: Vec<Arc<dyn SettleObserver>>,
}

impl<S> BoundedScheduler<S>
where
    S: Spawn,
{
    /// Create a scheduler that starts tasks on `spawner`.
    pub fn new(spawner: S) -> Self {
        Self {
            spawner,
            name: "default".into(),
            log_settlements: true,
            observers: Vec::new(),
        }
    }

    /// Name used in log spans and audit events.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether failed settlements are logged at `warn`.
    #[must_use]
    pub const fn with_log_settlements(mut self, enabled: bool) -> Self {
        self.log_settlements = enabled;
        self
    }

    /// Attach an observer notified on every admission and settlement.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SettleObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Scheduler name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run `tasks` with at most `limit` in flight and wait for all of them.
    ///
    /// Factories are invoked in iteration order. A new one is started as
    /// soon as any running task settles, successfully or not. The returned
    /// future resolves once every task has settled; individual failures are
    /// counted in the summary but never stop the batch.
    ///
    /// The limit is checked when `run` is called, not when the future is
    /// first polled: an invalid limit drops `tasks` right away and the
    /// returned future is already resolved with the error.
    ///
    /// # Errors
    ///
    /// - `SchedulerError::InvalidLimit` if `limit` is 0. No factory is
    ///   invoked in that case.
    /// - `SchedulerError::CompletionChannelClosed` if the completion channel
    ///   ends while tasks are in flight.
    pub fn run<I, F>(
        &self,
        tasks: I,
        limit: usize,
    ) -> impl Future<Output = Result<BatchSummary, SchedulerError>> + use<'_, S, I, F>
    where
        I: IntoIterator<Item = F>,
        F: TaskFactory,
        F::Future: Send + 'static,
        F::Output: Send + 'static,
    {
        match ConcurrencyLimit::new(limit) {
            Ok(limit) => Either::Left(self.run_with_limit(tasks, limit)),
            Err(e) => Either::Right(future::ready(Err(e))),
        }
    }

    /// Same as [`run`](Self::run) with an already validated limit.
    ///
    /// # Errors
    ///
    /// `SchedulerError::CompletionChannelClosed` if the completion channel
    /// ends while tasks are in flight.
    pub async fn run_with_limit<I, F>(
        &self,
        tasks: I,
        limit: ConcurrencyLimit,
    ) -> Result<BatchSummary, SchedulerError>
    where
        I: IntoIterator<Item = F>,
        F: TaskFactory,
        F::Future: Send + 'static,
        F::Output: Send + 'static,
    {
        let admission = Admission::new(self.name.as_str(), limit, tasks)
            .with_observers(self.observers.clone())
            .with_log_settlements(self.log_settlements);
        let span = tracing::info_span!(
            "batch",
            batch_id = %admission.batch_id(),
            name = %admission.name(),
        );
        self.coordinate(admission, limit).instrument(span).await
    }

    async fn coordinate<F>(
        &self,
        mut admission: Admission<F>,
        limit: ConcurrencyLimit,
    ) -> Result<BatchSummary, SchedulerError>
    where
        F: TaskFactory,
        F::Future: Send + 'static,
        F::Output: Send + 'static,
    {
        tracing::info!(tasks = admission.total(), %limit, "batch started");
        let (tx, mut rx) = mpsc::unbounded::<(TaskIndex, Settlement)>();

        while let Some((index, factory)) = admission.admit() {
            let guard = SettleGuard::new(index, tx.clone());
            let task = factory.start();
            self.spawner.spawn(async move {
                let outcome = task.await;
                guard.settle(outcome.settlement());
            });

            if admission.at_capacity() {
                let (settled, settlement) = next_settlement(&mut rx, &admission).await?;
                admission.settle(settled, &settlement);
            }
        }

        while admission.in_flight() > 0 {
            let (settled, settlement) = next_settlement(&mut rx, &admission).await?;
            admission.settle(settled, &settlement);
        }

        let summary = admission.summary();
        tracing::info!(
            admitted = summary.admitted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            peak_in_flight = summary.peak_in_flight,
            elapsed_ms = u64::try_from(summary.elapsed.as_millis()).unwrap_or(u64::MAX),
            "batch complete"
        );
        Ok(summary)
    }
}

async fn next_settlement<F>(
    rx: &mut mpsc::UnboundedReceiver<(TaskIndex, Settlement)>,
    admission: &Admission<F>,
) -> Result<(TaskIndex, Settlement), SchedulerError> {
    rx.next().await.ok_or_else(|| {
        tracing::error!(in_flight = admission.in_flight(), "completion channel closed");
        SchedulerError::CompletionChannelClosed {
            in_flight: admission.in_flight(),
        }
    })
}
