//! Deterministic clock for tests

use super::{Scheduler, Task};
use parking_lot::Mutex;
use std::time::Duration;
use tracing::trace;

struct Pending {
    due_at: Duration,
    order: u64,
    task: Task,
}

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_order: u64,
    queue: Vec<Pending>,
}

/// A clock that only moves when told to
///
/// Queued tasks run during [`advance`](Self::advance), [`advance_to`](Self::advance_to),
/// [`run_next`](Self::run_next) or [`flush`](Self::flush), on the calling
/// thread. The queue lock is released while a task runs, so tasks may schedule
/// more tasks.
#[derive(Default)]
pub struct VirtualClock {
    state: Mutex<ClockState>,
}

impl VirtualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deadlines of queued tasks, in the order they will run
    #[must_use]
    pub fn pending(&self) -> Vec<Duration> {
        let state = self.state.lock();
        let mut due: Vec<(Duration, u64)> = state.queue.iter().map(|p| (p.due_at, p.order)).collect();
        due.sort_unstable();
        due.into_iter().map(|(at, _)| at).collect()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Move time forward by `by`, running every task that falls due
    ///
    /// Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        self.advance_to(target)
    }

    /// Move time forward to `target`, running every task due by then
    ///
    /// Returns the number of tasks run. A target in the past runs what is
    /// already due and leaves the clock where it is.
    pub fn advance_to(&self, target: Duration) -> usize {
        let mut ran = 0;
        while let Some(task) = self.pop_next(Some(target)) {
            task();
            ran += 1;
        }
        let mut state = self.state.lock();
        state.now = state.now.max(target);
        trace!(now = ?state.now, ran, "advanced virtual clock");
        ran
    }

    /// Jump to the earliest deadline and run that one task
    pub fn run_next(&self) -> bool {
        self.pop_next(None).map(|task| task()).is_some()
    }

    /// Run everything queued, including tasks queued along the way
    pub fn flush(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }

    /// Remove the next task due by `limit` and move the clock to its deadline
    fn pop_next(&self, limit: Option<Duration>) -> Option<Task> {
        let mut state = self.state.lock();
        let index = state
            .queue
            .iter()
            .enumerate()
            .filter(|(_, p)| limit.is_none_or(|limit| p.due_at <= limit))
            .min_by_key(|(_, p)| (p.due_at, p.order))
            .map(|(i, _)| i)?;
        let pending = state.queue.swap_remove(index);
        state.now = state.now.max(pending.due_at);
        Some(pending.task)
    }
}

impl Scheduler for VirtualClock {
    fn now(&self) -> Duration {
        self.state.lock().now
    }

    fn schedule_at(&self, deadline: Duration, task: Task) {
        let mut state = self.state.lock();
        let order = state.next_order;
        state.next_order += 1;
        state.queue.push(Pending {
            due_at: deadline,
            order,
            task,
        });
    }
}
