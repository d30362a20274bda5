//! Tests for audit sink

use bounded_batch::core::{
    build_audit_event, AuditAction, AuditObserver, AuditSink, InMemoryAuditSink, SettleObserver,
    Settlement,
};
use uuid::Uuid;

#[test]
fn test_in_memory_audit_sink() {
    let batch = Uuid::new_v4();
    let mut sink = InMemoryAuditSink::new(10);

    sink.record(build_audit_event(batch, "pool1", 3, AuditAction::Admit, None));
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].batch_id, batch);
    assert_eq!(events[0].task_index, 3);
    assert_eq!(events[0].action, AuditAction::Admit);
}

#[test]
fn test_audit_sink_overflow() {
    let batch = Uuid::new_v4();
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event(batch, "s", 1, AuditAction::Admit, None));
    sink.record(build_audit_event(batch, "s", 2, AuditAction::Admit, None));
    sink.record(build_audit_event(batch, "s", 3, AuditAction::Admit, None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].task_index, 2); // First one popped
    assert_eq!(events[1].task_index, 3);
}

#[test]
fn test_audit_event_serializes_action_in_snake_case() {
    let event = build_audit_event(
        Uuid::new_v4(),
        "s",
        0,
        AuditAction::Fail,
        Some("timeout".to_string()),
    );
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["action"], "fail");
    assert_eq!(json["detail"], "timeout");
    assert_eq!(json["task_index"], 0);
}

#[test]
fn test_audit_observer_maps_settlements() {
    let observer = AuditObserver::new("unit", InMemoryAuditSink::new(8));
    let batch = Uuid::new_v4();

    observer.on_admit(batch, 0);
    observer.on_admit(batch, 1);
    observer.on_settle(batch, 1, &Settlement::Succeeded);
    observer.on_settle(batch, 0, &Settlement::Failed("boom".into()));

    let actions: Vec<_> = observer
        .with_sink(InMemoryAuditSink::events)
        .into_iter()
        .map(|e| (e.task_index, e.action))
        .collect();
    assert_eq!(
        actions,
        vec![
            (0, AuditAction::Admit),
            (1, AuditAction::Admit),
            (1, AuditAction::Succeed),
            (0, AuditAction::Fail),
        ]
    );
}
