//! Shared fixtures for scheduler integration tests.
//!
//! `Probe` records when each task was invoked and when it settled, and how
//! many were running at once, so tests can check ordering and the limit
//! from the tasks' side rather than trusting the scheduler's own counters.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use futures::FutureExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Invoked(usize),
    Settled(usize),
}

#[derive(Default)]
pub struct Probe {
    events: Mutex<Vec<(Event, Instant)>>,
    running: AtomicUsize,
    max_running: AtomicUsize,
}

pub type TaskResult = Result<usize, String>;

impl Probe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push((event, Instant::now()));
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().iter().map(|(e, _)| *e).collect()
    }

    pub fn invoked(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Invoked(i) => Some(i),
                Event::Settled(_) => None,
            })
            .collect()
    }

    pub fn settled(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Settled(i) => Some(i),
                Event::Invoked(_) => None,
            })
            .collect()
    }

    pub fn max_running(&self) -> usize {
        self.max_running.load(Ordering::SeqCst)
    }

    /// Time between the first and last invocation.
    pub fn invocation_spread(&self) -> Duration {
        let events = self.events.lock().unwrap();
        let mut times = events
            .iter()
            .filter(|(e, _)| matches!(e, Event::Invoked(_)))
            .map(|(_, t)| *t);
        let Some(first) = times.next() else {
            return Duration::ZERO;
        };
        times.last().map_or(Duration::ZERO, |last| last - first)
    }

    /// Factory for a task that sleeps `delay_ms` and then succeeds, or fails
    /// when `fail` is set.
    pub fn task(
        self: &Arc<Self>,
        index: usize,
        delay_ms: u64,
        fail: bool,
    ) -> impl FnOnce() -> BoxFuture<'static, TaskResult> + Send + 'static {
        let probe = Arc::clone(self);
        move || {
            probe.record(Event::Invoked(index));
            let now = probe.running.fetch_add(1, Ordering::SeqCst) + 1;
            probe.max_running.fetch_max(now, Ordering::SeqCst);

            async move {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                probe.running.fetch_sub(1, Ordering::SeqCst);
                probe.record(Event::Settled(index));
                if fail {
                    Err(format!("task {index} failed"))
                } else {
                    Ok(index)
                }
            }
            .boxed()
        }
    }

    /// One succeeding task per delay, indexed from 0.
    pub fn tasks(
        self: &Arc<Self>,
        delays_ms: &[u64],
    ) -> Vec<impl FnOnce() -> BoxFuture<'static, TaskResult> + Send + 'static> {
        delays_ms
            .iter()
            .enumerate()
            .map(|(i, &ms)| self.task(i, ms, false))
            .collect()
    }
}
