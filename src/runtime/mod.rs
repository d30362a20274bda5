//! Runtime adapters for spawning task execution.

#[cfg(feature = "tokio-runtime")]
pub mod batch;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_spawner;

#[cfg(feature = "tokio-runtime")]
pub use batch::run_batch;
#[cfg(feature = "tokio-runtime")]
pub use tokio_spawner::TokioSpawner;
