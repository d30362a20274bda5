//! Audit sink implementations.
//!
//! Records admissions and settlements so per-task outcomes stay visible even
//! though the batch result itself carries none.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::TaskIndex;
use crate::util::clock::now_ms;

/// What happened to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Factory invoked, task entered the in-flight set.
    Admit,
    /// Task settled successfully.
    Succeed,
    /// Task settled with a failure.
    Fail,
}

/// Audit event structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Batch the task belongs to.
    pub batch_id: Uuid,
    /// Scheduler name from configuration.
    pub scheduler: String,
    /// Backlog position of the task.
    pub task_index: TaskIndex,
    /// Action taken.
    pub action: AuditAction,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Failure reason, if any.
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Helper to build an audit event from context.
pub fn build_audit_event(
    batch_id: Uuid,
    scheduler: impl Into<String>,
    task_index: TaskIndex,
    action: AuditAction,
    detail: Option<String>,
) -> AuditEvent {
    let created_at_ms = now_ms();
    let action_tag = match action {
        AuditAction::Admit => "admit",
        AuditAction::Succeed => "succeed",
        AuditAction::Fail => "fail",
    };
    AuditEvent {
        event_id: format!("{batch_id}-{task_index}-{action_tag}"),
        batch_id,
        scheduler: scheduler.into(),
        task_index,
        action,
        created_at_ms,
        detail,
    }
}
