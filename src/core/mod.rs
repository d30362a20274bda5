//! Core scheduling abstractions and in-flight accounting.

pub mod error;
pub mod limit;
pub mod executor;
pub mod audit;
pub mod observer;
pub mod scheduler;
pub mod in_place;
#[cfg(not(target_arch = "wasm32"))]
pub mod blocking;

pub(crate) mod admission;
pub(crate) mod settle;

pub use error::{AppResult, SchedulerError};
pub use limit::ConcurrencyLimit;
pub use executor::{Settlement, TaskFactory, TaskIndex, TaskOutcome};
pub use audit::{build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use observer::{observer_fn, AuditObserver, FnObserver, SettleObserver};
pub use admission::{BatchSummary, SchedulerPhase};
pub use scheduler::{BoundedScheduler, Spawn};
pub use in_place::run_in_place;
#[cfg(not(target_arch = "wasm32"))]
pub use blocking::run_blocking;
