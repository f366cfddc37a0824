//! Deferred task scheduling
//!
//! The driver turns a word into `(offset, action)` pairs and hands each one to a
//! [`Scheduler`] as an independent task due at `start + offset`. Two
//! implementations:
//! - [`VirtualClock`]: nothing runs until the caller advances time (tests)
//! - [`TimerThread`]: one background thread runs tasks at wall-clock deadlines

mod timer_thread;
mod virtual_clock;

pub use timer_thread::TimerThread;
pub use virtual_clock::VirtualClock;

use std::time::Duration;

/// A deferred unit of work
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Timer service
///
/// Tasks with earlier deadlines run first; tasks sharing a deadline run in the
/// order they were scheduled. Tasks run one at a time.
pub trait Scheduler: Send + Sync {
    /// Monotonic time elapsed since the scheduler was created
    fn now(&self) -> Duration;

    /// Run `task` once [`now`](Scheduler::now) reaches `deadline`
    ///
    /// A deadline in the past runs as soon as possible.
    fn schedule_at(&self, deadline: Duration, task: Task);

    /// Run `task` after `delay` from now
    fn schedule(&self, delay: Duration, task: Task) {
        self.schedule_at(self.now() + delay, task);
    }
}
