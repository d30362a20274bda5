//! Bounded batch over a fixed set of OS worker threads.
//!
//! For blocking or CPU-bound work that should not sit on an async runtime.
//! The calling thread is the coordinator: it invokes each factory in backlog
//! order, hands the returned job to the worker pool over a crossbeam channel,
//! and blocks on a second channel until a slot frees. The pool holds
//! `min(limit, backlog)` threads for the whole batch, so a long backlog never
//! costs more than `limit` threads.

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, error, info};

use crate::core::admission::Admission;
use crate::core::settle::SettleGuard;
use crate::core::{BatchSummary, ConcurrencyLimit, SchedulerError, Settlement, TaskIndex, TaskOutcome};

type Completions = Sender<(TaskIndex, Settlement)>;

/// A started task waiting for a worker.
struct Job<J> {
    work: J,
    guard: SettleGuard<Completions>,
}

/// Run blocking `tasks` on worker threads with at most `limit` in flight.
///
/// Each task is a factory returning the blocking job to run. Factories are
/// called on the calling thread in backlog order, exactly like the async
/// drivers start their futures; the jobs they return run on the pool.
/// Blocks until every job has settled. A job that panics settles as a
/// failure and its worker keeps serving the batch.
///
/// ```rust
/// let tasks = (0..6_u64).map(|i| move || move || {
///     std::thread::sleep(std::time::Duration::from_millis(i));
/// });
/// let summary = bounded_batch::core::run_blocking(tasks, 2).unwrap();
/// assert_eq!(summary.succeeded, 6);
/// ```
///
/// # Errors
///
/// - `SchedulerError::InvalidLimit` if `limit` is 0. No factory is invoked.
/// - `SchedulerError::WorkerSpawn` if not a single worker thread could be
///   started. No factory is invoked.
/// - `SchedulerError::CompletionChannelClosed` if the completion channel
///   ends while tasks are in flight.
pub fn run_blocking<I, F, J, O>(tasks: I, limit: usize) -> Result<BatchSummary, SchedulerError>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> J,
    J: FnOnce() -> O + Send + 'static,
    O: TaskOutcome,
{
    let limit = ConcurrencyLimit::new(limit)?;
    let mut admission = Admission::new("blocking", limit, tasks);
    let span = tracing::info_span!("batch", batch_id = %admission.batch_id(), name = %admission.name());
    let _entered = span.enter();
    info!(tasks = admission.total(), %limit, "batch started");

    let (done_tx, done_rx) = unbounded::<(TaskIndex, Settlement)>();
    let (job_tx, job_rx) = unbounded::<Job<J>>();

    let pool_size = limit.get().min(admission.total());
    let mut workers: Vec<JoinHandle<()>> = Vec::with_capacity(pool_size);
    let mut spawn_error = None;
    for worker_id in 0..pool_size {
        match spawn_worker::<J, O>(worker_id, job_rx.clone()) {
            Ok(handle) => workers.push(handle),
            Err(e) => {
                error!(worker_id, error = %e, "failed to spawn worker thread");
                spawn_error = Some(e);
            }
        }
    }
    drop(job_rx);
    if workers.is_empty() {
        if let Some(e) = spawn_error {
            return Err(SchedulerError::WorkerSpawn(e.to_string()));
        }
    }

    while let Some((index, factory)) = admission.admit() {
        let work = factory();
        let guard = SettleGuard::new(index, done_tx.clone());
        // A rejected job is dropped here and its guard reports the failure.
        if job_tx.send(Job { work, guard }).is_err() {
            error!(task = index, "worker pool is gone");
        }

        if admission.at_capacity() {
            let (settled, settlement) = done_rx.recv().map_err(|_| closed(&admission))?;
            admission.settle(settled, &settlement);
        }
    }

    while admission.in_flight() > 0 {
        let (settled, settlement) = done_rx.recv().map_err(|_| closed(&admission))?;
        admission.settle(settled, &settlement);
    }

    drop(job_tx);
    for worker in workers {
        if worker.join().is_err() {
            debug!("worker thread panicked");
        }
    }

    let summary = admission.summary();
    info!(
        admitted = summary.admitted,
        failed = summary.failed,
        peak_in_flight = summary.peak_in_flight,
        "batch complete"
    );
    Ok(summary)
}

fn spawn_worker<J, O>(worker_id: usize, jobs: Receiver<Job<J>>) -> std::io::Result<JoinHandle<()>>
where
    J: FnOnce() -> O + Send + 'static,
    O: TaskOutcome,
{
    thread::Builder::new()
        .name(format!("bounded-batch-{worker_id}"))
        .spawn(move || {
            debug!(worker_id, "worker thread started");
            // Exits once the coordinator drops the job sender.
            while let Ok(Job { work, guard }) = jobs.recv() {
                match panic::catch_unwind(AssertUnwindSafe(work)) {
                    Ok(outcome) => guard.settle(outcome.settlement()),
                    Err(_) => guard.settle(Settlement::Failed("task panicked".into())),
                }
            }
            debug!(worker_id, "worker thread exiting");
        })
}

fn closed<F>(admission: &Admission<F>) -> SchedulerError {
    error!(in_flight = admission.in_flight(), "completion channel closed");
    SchedulerError::CompletionChannelClosed {
        in_flight: admission.in_flight(),
    }
}
