//! Hooks for watching a batch from the outside.
//!
//! The scheduler itself ignores what a task settled with. Observers are how a
//! caller gets to see individual failures without changing scheduling
//! behaviour.

use parking_lot::Mutex;
use uuid::Uuid;

use crate::core::audit::{build_audit_event, AuditAction, AuditSink};
use crate::core::{SchedulerPhase, Settlement, TaskIndex};

/// Receives admission and settlement notifications.
///
/// Called from the coordinator only, one notification at a time, in the
/// order the coordinator observed the events.
pub trait SettleObserver: Send + Sync {
    /// A factory was invoked and its task entered the in-flight set.
    fn on_admit(&self, _batch_id: Uuid, _index: TaskIndex) {}

    /// A task left the in-flight set.
    fn on_settle(&self, _batch_id: Uuid, _index: TaskIndex, _settlement: &Settlement) {}

    /// The batch moved from admitting to draining, or from draining to complete.
    fn on_phase(&self, _batch_id: Uuid, _phase: SchedulerPhase) {}
}

/// Observer that forwards settlements to a closure.
pub struct FnObserver<F> {
    f: F,
}

/// Wrap a closure as a settlement observer.
///
/// ```rust
/// use bounded_batch::core::{observer_fn, Settlement};
///
/// let observer = observer_fn(|_batch, index, settlement: &Settlement| {
///     if settlement.is_failure() {
///         eprintln!("task {index} failed");
///     }
/// });
/// # let _ = observer;
/// ```
pub const fn observer_fn<F>(f: F) -> FnObserver<F>
where
    F: Fn(Uuid, TaskIndex, &Settlement) + Send + Sync,
{
    FnObserver { f }
}

impl<F> SettleObserver for FnObserver<F>
where
    F: Fn(Uuid, TaskIndex, &Settlement) + Send + Sync,
{
    fn on_settle(&self, batch_id: Uuid, index: TaskIndex, settlement: &Settlement) {
        (self.f)(batch_id, index, settlement);
    }
}

/// Observer that writes every admission and settlement to an audit sink.
pub struct AuditObserver<A> {
    scheduler: String,
    sink: Mutex<A>,
}

impl<A: AuditSink> AuditObserver<A> {
    /// Record into `sink`, tagging events with the scheduler name.
    pub fn new(scheduler: impl Into<String>, sink: A) -> Self {
        Self {
            scheduler: scheduler.into(),
            sink: Mutex::new(sink),
        }
    }

    /// Run `f` against the underlying sink.
    pub fn with_sink<R>(&self, f: impl FnOnce(&A) -> R) -> R {
        let sink = self.sink.lock();
        f(&*sink)
    }
}

impl<A: AuditSink> SettleObserver for AuditObserver<A> {
    fn on_admit(&self, batch_id: Uuid, index: TaskIndex) {
        let event = build_audit_event(batch_id, self.scheduler.as_str(), index, AuditAction::Admit, None);
        self.sink.lock().record(event);
    }

    fn on_settle(&self, batch_id: Uuid, index: TaskIndex, settlement: &Settlement) {
        let (action, detail) = match settlement {
            Settlement::Succeeded => (AuditAction::Succeed, None),
            Settlement::Failed(reason) => (AuditAction::Fail, Some(reason.clone())),
        };
        let event = build_audit_event(batch_id, self.scheduler.as_str(), index, action, detail);
        self.sink.lock().record(event);
    }
}
