//! One-call batch entry point on the current tokio runtime.

use std::future::Future;

use futures::future::{self, Either};

use crate::core::{BatchSummary, BoundedScheduler, ConcurrencyLimit, SchedulerError, TaskFactory};

use super::TokioSpawner;

/// Run `tasks` on the current tokio runtime with at most `limit` in flight.
///
/// Shorthand for `BoundedScheduler::new(TokioSpawner::current()).run(tasks, limit)`.
///
/// ```rust
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use std::time::Duration;
///
/// let delays = [40_u64, 20, 40, 10, 30, 25, 35];
/// let tasks = delays.into_iter().enumerate().map(|(i, ms)| move || async move {
///     tokio::time::sleep(Duration::from_millis(ms)).await;
///     Ok::<_, std::io::Error>(format!("response {}", i + 1))
/// });
///
/// let summary = bounded_batch::runtime::run_batch(tasks, 3).await.unwrap();
/// assert_eq!(summary.admitted, 7);
/// assert!(summary.all_succeeded());
/// # }
/// ```
///
/// # Errors
///
/// See [`BoundedScheduler::run`]. The limit is checked when `run_batch` is
/// called.
///
/// # Panics
///
/// Panics when the returned future is polled outside a tokio runtime.
pub fn run_batch<I, F>(
    tasks: I,
    limit: usize,
) -> impl Future<Output = Result<BatchSummary, SchedulerError>>
where
    I: IntoIterator<Item = F>,
    F: TaskFactory,
    F::Future: Send + 'static,
    F::Output: Send + 'static,
{
    match ConcurrencyLimit::new(limit) {
        Ok(limit) => Either::Left(async move {
            BoundedScheduler::new(TokioSpawner::current())
                .run_with_limit(tasks, limit)
                .await
        }),
        Err(e) => Either::Right(future::ready(Err(e))),
    }
}
