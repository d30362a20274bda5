//! Tests for tokio spawner utilities

use bounded_batch::core::{BoundedScheduler, Spawn};
use bounded_batch::runtime::TokioSpawner;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_spawner_spawn() {
    let spawner = TokioSpawner::new(tokio::runtime::Handle::current());

    let (tx, rx) = tokio::sync::oneshot::channel();
    spawner.spawn(async move {
        tx.send(123).unwrap();
    });

    let result = rx.await.expect("oneshot result");
    assert_eq!(result, 123);
}

#[test]
fn test_owned_runtime_spawner_runs_batch() {
    let spawner = TokioSpawner::with_worker_threads(2).unwrap();
    let scheduler = BoundedScheduler::new(spawner.clone());

    let tasks: Vec<_> = (0..4_u64)
        .map(|i| {
            move || async move {
                tokio::time::sleep(std::time::Duration::from_millis(i)).await;
                Ok::<_, String>(i)
            }
        })
        .collect();

    // Coordinate from a plain thread; task bodies run on the owned runtime.
    let summary = futures::executor::block_on(scheduler.run(tasks, 2)).unwrap();
    assert_eq!(summary.succeeded, 4);
}
