use tracing::trace;

use crate::dom::dom_model::{Document, NodeId};

/// Work a one-shot timer performs when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerTask {
    /// Remove the visibility class from the toast
    HideToast { toast: NodeId, class: String },
}

impl TimerTask {
    fn run(&self, doc: &mut Document) {
        match self {
            TimerTask::HideToast { toast, class } => {
                // The toast may have been removed since scheduling; nothing to hide then.
                if let Err(e) = doc.remove_class(*toast, class) {
                    trace!(error = %e, "toast hide skipped");
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: u64,
    pub due_at: u64,
    pub order: u64,
    pub task: TimerTask,
}

/// One-shot timers on a virtual millisecond clock.
///
/// Timers cannot be cancelled: every scheduled task fires once
/// its due time is reached. Tasks due at the same instant run in scheduling
/// order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now_ms: u64,
    next_id: u64,
    next_order: u64,
    tasks: Vec<PendingTimer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// setTimeout equivalent. Returns the timer id.
    pub fn schedule(&mut self, delay_ms: u64, task: TimerTask) -> u64 {
        self.next_id += 1;
        self.next_order += 1;
        let timer = PendingTimer {
            id: self.next_id,
            due_at: self.now_ms.saturating_add(delay_ms),
            order: self.next_order,
            task,
        };
        trace!(id = timer.id, due_at = timer.due_at, "timer scheduled");
        self.tasks.push(timer);
        self.next_id
    }

    /// Pending timers sorted by `(due_at, order)`.
    pub fn pending(&self) -> Vec<PendingTimer> {
        let mut timers = self.tasks.clone();
        timers.sort_by_key(|t| (t.due_at, t.order));
        timers
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Move the clock forward by `delta_ms` and run every task that became due.
    /// Returns how many tasks ran.
    pub fn advance_time(&mut self, delta_ms: u64, doc: &mut Document) -> usize {
        let target = self.now_ms.saturating_add(delta_ms);
        let mut ran = 0;

        while let Some(index) = self.next_due_index(target) {
            let timer = self.tasks.remove(index);
            // Observers see the clock at the task's own due time while it runs.
            self.now_ms = self.now_ms.max(timer.due_at);
            trace!(id = timer.id, now_ms = self.now_ms, "timer fired");
            timer.task.run(doc);
            ran += 1;
        }

        self.now_ms = target;
        ran
    }

    /// Run every pending task regardless of due time.
    pub fn flush(&mut self, doc: &mut Document) -> usize {
        let last_due = self.tasks.iter().map(|t| t.due_at).max().unwrap_or(self.now_ms);
        let delta = last_due.saturating_sub(self.now_ms);
        self.advance_time(delta, doc)
    }

    fn next_due_index(&self, target: u64) -> Option<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_at <= target)
            .min_by_key(|(_, t)| (t.due_at, t.order))
            .map(|(i, _)| i)
    }
}
