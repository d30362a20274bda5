//! Tokio runtime spawner implementation.

use std::future::Future;
use std::sync::Arc;

use crate::core::Spawn;

/// Tokio-based spawner that executes tasks on a tokio runtime.
#[derive(Clone)]
pub struct TokioSpawner {
    handle: tokio::runtime::Handle,
    /// Keeps an owned runtime alive for spawners built with
    /// [`with_worker_threads`](Self::with_worker_threads).
    _runtime: Option<Arc<tokio::runtime::Runtime>>,
}

impl TokioSpawner {
    /// Create a `TokioSpawner` from a tokio runtime handle.
    #[must_use]
    pub const fn new(handle: tokio::runtime::Handle) -> Self {
        Self {
            handle,
            _runtime: None,
        }
    }

    /// Spawner for the runtime the caller is running on.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }

    /// Create a `TokioSpawner` with a new multi-threaded runtime with specified worker threads.
    ///
    /// The runtime lives as long as the last clone of this spawner; drop
    /// that clone outside of async contexts, as tokio forbids dropping a
    /// runtime from within one.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the runtime cannot be built.
    pub fn with_worker_threads(worker_threads: usize) -> Result<Self, std::io::Error> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(worker_threads)
            .thread_name("bounded-batch-worker")
            .enable_all()
            .build()?;
        Ok(Self {
            handle: runtime.handle().clone(),
            _runtime: Some(Arc::new(runtime)),
        })
    }

    /// Handle to the runtime tasks are spawned on.
    #[must_use]
    pub const fn handle(&self) -> &tokio::runtime::Handle {
        &self.handle
    }
}

impl Spawn for TokioSpawner {
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(fut);
    }
}
