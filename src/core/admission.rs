//! Backlog cursor and in-flight bookkeeping shared by every driver.
//!
//! A driver owns exactly one `Admission` for the lifetime of a batch. It is
//! the single mutator of the cursor and the in-flight set: tasks never touch
//! it directly, they report settlement back to the driver, which then calls
//! [`Admission::settle`].

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{ConcurrencyLimit, SettleObserver, Settlement, TaskIndex};

/// Where a batch is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerPhase {
    /// Backlog still has unstarted tasks.
    Admitting,
    /// Backlog exhausted, tasks still in flight.
    Draining,
    /// Nothing left to start or wait for.
    Complete,
}

/// Scheduling statistics for a finished batch.
///
/// Deliberately carries no task results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Identifier used in logs and audit events for this batch.
    pub batch_id: Uuid,
    /// Limit the batch ran under.
    pub limit: ConcurrencyLimit,
    /// Factories invoked. Always equals the backlog length.
    pub admitted: usize,
    /// Tasks that settled successfully.
    pub succeeded: usize,
    /// Tasks that settled with a failure.
    pub failed: usize,
    /// Largest in-flight set seen at an admission decision.
    pub peak_in_flight: usize,
    /// Wall time from first admission to completion.
    pub elapsed: Duration,
}

impl BatchSummary {
    /// True when no task failed.
    #[must_use]
    pub const fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Per-batch admission state.
pub(crate) struct Admission<F> {
    batch_id: Uuid,
    name: String,
    limit: ConcurrencyLimit,
    backlog: std::vec::IntoIter<F>,
    total: usize,
    cursor: usize,
    in_flight: HashSet<TaskIndex>,
    succeeded: usize,
    failed: usize,
    peak_in_flight: usize,
    phase: SchedulerPhase,
    log_settlements: bool,
    observers: Vec<Arc<dyn SettleObserver>>,
    started: Instant,
}

impl<F> Admission<F> {
    pub(crate) fn new(
        name: impl Into<String>,
        limit: ConcurrencyLimit,
        tasks: impl IntoIterator<Item = F>,
    ) -> Self {
        let backlog: Vec<F> = tasks.into_iter().collect();
        let total = backlog.len();
        let phase = if total == 0 {
            SchedulerPhase::Complete
        } else {
            SchedulerPhase::Admitting
        };
        Self {
            batch_id: Uuid::new_v4(),
            name: name.into(),
            limit,
            backlog: backlog.into_iter(),
            total,
            cursor: 0,
            in_flight: HashSet::with_capacity(limit.get().min(total)),
            succeeded: 0,
            failed: 0,
            peak_in_flight: 0,
            phase,
            log_settlements: true,
            observers: Vec::new(),
            started: Instant::now(),
        }
    }

    pub(crate) fn with_observers(mut self, observers: Vec<Arc<dyn SettleObserver>>) -> Self {
        self.observers = observers;
        self
    }

    pub(crate) const fn with_log_settlements(mut self, enabled: bool) -> Self {
        self.log_settlements = enabled;
        self
    }

    pub(crate) const fn batch_id(&self) -> Uuid {
        self.batch_id
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) const fn total(&self) -> usize {
        self.total
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    #[cfg(test)]
    pub(crate) const fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    /// Take the next factory in backlog order and mark it in flight.
    ///
    /// The caller must invoke the factory right away; the index is already
    /// counted against the limit.
    pub(crate) fn admit(&mut self) -> Option<(TaskIndex, F)> {
        let factory = self.backlog.next()?;
        let index = self.cursor;
        self.cursor += 1;
        self.in_flight.insert(index);
        self.peak_in_flight = self.peak_in_flight.max(self.in_flight.len());

        tracing::debug!(
            batch_id = %self.batch_id,
            task = index,
            in_flight = self.in_flight.len(),
            "admitted task"
        );
        for observer in &self.observers {
            observer.on_admit(self.batch_id, index);
        }

        if self.cursor == self.total {
            self.transition();
        }
        Some((index, factory))
    }

    /// Whether the driver must wait for a settlement before admitting again.
    pub(crate) fn at_capacity(&self) -> bool {
        self.in_flight.len() >= self.limit.get()
    }

    /// Remove a settled task from the in-flight set.
    pub(crate) fn settle(&mut self, index: TaskIndex, settlement: &Settlement) {
        let removed = self.in_flight.remove(&index);
        debug_assert!(removed, "task {index} settled twice or was never admitted");

        match settlement {
            Settlement::Succeeded => {
                self.succeeded += 1;
                tracing::debug!(batch_id = %self.batch_id, task = index, "task settled");
            }
            Settlement::Failed(reason) => {
                self.failed += 1;
                if self.log_settlements {
                    tracing::warn!(batch_id = %self.batch_id, task = index, %reason, "task failed");
                }
            }
        }
        for observer in &self.observers {
            observer.on_settle(self.batch_id, index, settlement);
        }

        if self.in_flight.is_empty() && self.cursor == self.total {
            self.transition();
        }
    }

    fn transition(&mut self) {
        let next = match (self.cursor < self.total, self.in_flight.is_empty()) {
            (true, _) => SchedulerPhase::Admitting,
            (false, false) => SchedulerPhase::Draining,
            (false, true) => SchedulerPhase::Complete,
        };
        if next != self.phase {
            tracing::debug!(
                batch_id = %self.batch_id,
                from = ?self.phase,
                to = ?next,
                "scheduler phase change"
            );
            self.phase = next;
            for observer in &self.observers {
                observer.on_phase(self.batch_id, next);
            }
        }
    }

    pub(crate) fn summary(&self) -> BatchSummary {
        debug_assert_eq!(self.phase, SchedulerPhase::Complete);
        BatchSummary {
            batch_id: self.batch_id,
            limit: self.limit,
            admitted: self.cursor,
            succeeded: self.succeeded,
            failed: self.failed,
            peak_in_flight: self.peak_in_flight,
            elapsed: self.started.elapsed(),
        }
    }
}
