//! Settlement reporting from running tasks back to the coordinator.

use crate::core::{Settlement, TaskIndex};

/// Channel end a running task uses to report that it settled.
pub(crate) trait CompletionSender: Send {
    /// Deliver the settlement. A closed receiver means the coordinator is
    /// gone and nobody is left to tell, so the message is dropped.
    fn notify(&self, index: TaskIndex, settlement: Settlement);
}

impl CompletionSender for futures::channel::mpsc::UnboundedSender<(TaskIndex, Settlement)> {
    fn notify(&self, index: TaskIndex, settlement: Settlement) {
        let _ = self.unbounded_send((index, settlement));
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl CompletionSender for crossbeam_channel::Sender<(TaskIndex, Settlement)> {
    fn notify(&self, index: TaskIndex, settlement: Settlement) {
        let _ = self.send((index, settlement));
    }
}

/// Reports a task's settlement exactly once.
///
/// If the task never reaches [`SettleGuard::settle`] (it panicked, or the
/// runtime dropped it) the guard reports a failure on drop, so the slot is
/// still released and the batch still completes.
pub(crate) struct SettleGuard<S: CompletionSender> {
    index: TaskIndex,
    sender: Option<S>,
}

impl<S: CompletionSender> SettleGuard<S> {
    pub(crate) const fn new(index: TaskIndex, sender: S) -> Self {
        Self {
            index,
            sender: Some(sender),
        }
    }

    pub(crate) fn settle(mut self, settlement: Settlement) {
        if let Some(sender) = self.sender.take() {
            sender.notify(self.index, settlement);
        }
    }
}

impl<S: CompletionSender> Drop for SettleGuard<S> {
    fn drop(&mut self) {
        if let Some(sender) = self.sender.take() {
            tracing::debug!(task = self.index, "task dropped without settling");
            sender.notify(self.index, Settlement::dropped());
        }
    }
}
