use std::time::Duration;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

struct ScheduledTask {
    id: TaskId,
    due: Duration,
    task: Box<dyn FnOnce()>,
}

/// Delayed work tied to the current level or case. The host advances the clock; a
/// level or case transition cancels everything still pending.
#[derive(Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn schedule<F>(&mut self, delay: Duration, task: F) -> TaskId
    where
        F: FnOnce() + 'static,
    {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            id,
            due: self.now + delay,
            task: Box::new(task),
        });
        id
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.tasks.len();
        self.tasks.clear();
        if cancelled > 0 {
            debug!(cancelled, "scheduled_work_cancelled");
        }
        cancelled
    }

    /// Moves the clock forward and runs every task that has come due, earliest first
    /// (ties in scheduling order). Returns how many ran.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        self.now += elapsed;
        let now = self.now;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|task| task.due <= now);
        self.tasks = pending;
        due.sort_by_key(|task| (task.due, task.id.0));

        let ran = due.len();
        for scheduled in due {
            (scheduled.task)();
        }
        ran
    }
}
