//! Bounded batch driven inside the caller's own future.
//!
//! No spawning: started tasks live in a `FuturesUnordered`, which is
//! exactly "race the in-flight set". Awaiting its next item yields whichever
//! task settles first. Tasks therefore need not be `Send` or `'static`, and
//! they make progress only while the batch future itself is being polled.

use std::future::Future;

use futures::future::{self, Either};
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use tracing::Instrument;

use crate::core::admission::Admission;
use crate::core::{BatchSummary, ConcurrencyLimit, SchedulerError, TaskFactory, TaskOutcome};

/// Run `tasks` with at most `limit` in flight, polling them in place.
///
/// Same admission rules as [`BoundedScheduler::run`](crate::core::BoundedScheduler::run).
/// A panic inside a task propagates out of this future.
///
/// ```rust
/// # futures::executor::block_on(async {
/// use std::cell::RefCell;
///
/// let log = RefCell::new(Vec::new());
/// let tasks = (0..4).map(|i| {
///     let log = &log;
///     move || async move { log.borrow_mut().push(i); }
/// });
/// let summary = bounded_batch::core::run_in_place(tasks, 2).await.unwrap();
/// assert_eq!(summary.admitted, 4);
/// assert_eq!(log.borrow().len(), 4);
/// # });
/// ```
///
/// # Errors
///
/// `SchedulerError::InvalidLimit` if `limit` is 0. The check happens when
/// `run_in_place` is called; `tasks` is dropped without invoking any factory
/// and the returned future is already resolved with the error.
pub fn run_in_place<I, F>(
    tasks: I,
    limit: usize,
) -> impl Future<Output = Result<BatchSummary, SchedulerError>>
where
    I: IntoIterator<Item = F>,
    F: TaskFactory,
{
    match ConcurrencyLimit::new(limit) {
        Ok(limit) => {
            let admission = Admission::new("in_place", limit, tasks);
            let span =
                tracing::info_span!("batch", batch_id = %admission.batch_id(), name = %admission.name());
            Either::Left(drive(admission, limit).instrument(span).map(Ok))
        }
        Err(e) => Either::Right(future::ready(Err(e))),
    }
}

async fn drive<F>(mut admission: Admission<F>, limit: ConcurrencyLimit) -> BatchSummary
where
    F: TaskFactory,
{
    tracing::info!(tasks = admission.total(), %limit, "batch started");
    let mut in_flight = FuturesUnordered::new();

    while let Some((index, factory)) = admission.admit() {
        let task = factory.start();
        in_flight.push(async move { (index, task.await.settlement()) });

        if admission.at_capacity() {
            if let Some((settled, settlement)) = in_flight.next().await {
                admission.settle(settled, &settlement);
            }
        }
    }

    while let Some((settled, settlement)) = in_flight.next().await {
        admission.settle(settled, &settlement);
    }

    let summary = admission.summary();
    tracing::info!(
        admitted = summary.admitted,
        failed = summary.failed,
        peak_in_flight = summary.peak_in_flight,
        "batch complete"
    );
    summary
}
