//! # Bounded Batch
//!
//! Run an ordered backlog of asynchronous tasks with at most `N` in flight.
//!
//! Given a list of task factories and a concurrency limit, the scheduler
//! starts tasks strictly in list order, keeps no more than `N` running,
//! starts the next one the moment any running task settles (success or
//! failure), and resolves once every task has settled.
//!
//! ## Key Properties
//!
//! - **FIFO admission**: task `k` is never started before task `k - 1`
//! - **Refill on any vacancy**: whichever task settles first frees its slot
//! - **No polling**: settlements arrive on a completion channel (or a
//!   `FuturesUnordered` race for the in-place driver)
//! - **Failure-transparent**: a failed task frees its slot like a successful
//!   one and never stops the batch; failures are visible through
//!   [`core::SettleObserver`] and the [`core::BatchSummary`] counters
//!
//! ## Drivers
//!
//! | Driver | Task bodies run on |
//! |---|---|
//! | [`core::BoundedScheduler`] / [`runtime::run_batch`] | a runtime, via [`core::Spawn`] |
//! | [`core::run_in_place`] | the caller's own future, no spawning |
//! | [`core::run_blocking`] | a fixed pool of OS worker threads |
//!
//! ```rust,ignore
//! use bounded_batch::runtime::run_batch;
//!
//! let tasks = urls.into_iter().map(|url| move || fetch(url));
//! let summary = run_batch(tasks, 4).await?;
//! println!("{} ok, {} failed", summary.succeeded, summary.failed);
//! ```
//!
//! With configuration, observers and an audit trail:
//!
//! ```rust,ignore
//! use bounded_batch::builders::SchedulerBuilder;
//! use bounded_batch::config::SchedulerConfig;
//! use bounded_batch::core::InMemoryAuditSink;
//! use bounded_batch::runtime::TokioSpawner;
//!
//! let (builder, audit) = SchedulerBuilder::from_config(SchedulerConfig::from_env()?)
//!     .audit(InMemoryAuditSink::new(1024));
//! let (scheduler, limit) = builder.build(TokioSpawner::current())?;
//! scheduler.run_with_limit(tasks, limit).await?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions and in-flight accounting.
pub mod core;
/// Configuration models for the scheduler.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Runtime adapters for spawning task execution.
pub mod runtime;
/// Shared utilities.
pub mod util;
