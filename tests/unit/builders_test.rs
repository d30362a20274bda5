//! Tests for builder modules

use bounded_batch::builders::{build_scheduler, SchedulerBuilder};
use bounded_batch::config::SchedulerConfig;
use bounded_batch::core::{InMemoryAuditSink, SchedulerError};
use bounded_batch::runtime::TokioSpawner;

#[tokio::test]
async fn test_scheduler_builder_defaults() {
    let builder = SchedulerBuilder::new();
    assert_eq!(builder.config().name, "default");
    assert!(builder.config().max_concurrency >= 1);

    let (scheduler, limit) = builder.build(TokioSpawner::current()).unwrap();
    assert_eq!(scheduler.name(), "default");
    assert!(limit.get() >= 1);
}

#[tokio::test]
async fn test_scheduler_builder_overrides() {
    let (scheduler, limit) = SchedulerBuilder::new()
        .name("uploads")
        .max_concurrency(6)
        .log_settlements(false)
        .build(TokioSpawner::current())
        .unwrap();
    assert_eq!(scheduler.name(), "uploads");
    assert_eq!(limit.get(), 6);
}

#[tokio::test]
async fn test_scheduler_builder_rejects_zero() {
    let result = SchedulerBuilder::new()
        .max_concurrency(0)
        .build(TokioSpawner::current());
    assert!(matches!(result, Err(SchedulerError::Config(_))));
}

#[tokio::test]
async fn test_build_scheduler_from_config() {
    let cfg = SchedulerConfig::from_json_str(r#"{ "max_concurrency": 2, "name": "cfg" }"#).unwrap();
    let (scheduler, limit) = build_scheduler(&cfg, TokioSpawner::current()).unwrap();
    assert_eq!(scheduler.name(), "cfg");
    assert_eq!(limit.get(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_builder_audit_handle_sees_batch() {
    let (builder, audit) = SchedulerBuilder::new()
        .name("audited")
        .max_concurrency(2)
        .audit(InMemoryAuditSink::new(32));
    let (scheduler, limit) = builder.build(TokioSpawner::current()).unwrap();

    let tasks: Vec<_> = (0..3).map(|_| || async {}).collect();
    scheduler.run_with_limit(tasks, limit).await.unwrap();

    assert_eq!(audit.with_sink(InMemoryAuditSink::events).len(), 6);
}
