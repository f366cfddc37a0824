//! Wall-clock scheduler backed by a single worker thread

use super::{Scheduler, Task};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

struct Entry {
    deadline: Instant,
    order: u64,
    task: Task,
}

impl Entry {
    fn key(&self) -> (Instant, u64) {
        (self.deadline, self.order)
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so the BinaryHeap pops the earliest deadline first
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Runs tasks at their deadlines on one background thread
///
/// Every task runs on the same thread, one after another, so tasks never
/// overlap. Dropping the scheduler lets queued tasks finish at their deadlines,
/// then joins the thread.
pub struct TimerThread {
    epoch: Instant,
    next_order: AtomicU64,
    sender: Option<mpsc::Sender<Entry>>,
    worker: Option<JoinHandle<()>>,
}

impl TimerThread {
    /// Start the worker thread
    ///
    /// # Panics
    /// Panics if the OS refuses to spawn a thread.
    #[must_use]
    pub fn start() -> Self {
        let (sender, receiver) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("wordle-pilot-timer".into())
            .spawn(move || run_worker(&receiver))
            .expect("failed to spawn timer thread");

        Self {
            epoch: Instant::now(),
            next_order: AtomicU64::new(0),
            sender: Some(sender),
            worker: Some(worker),
        }
    }
}

fn run_worker(receiver: &mpsc::Receiver<Entry>) {
    let mut heap: BinaryHeap<Entry> = BinaryHeap::new();
    let mut open = true;

    loop {
        while heap.peek().is_some_and(|next| next.deadline <= Instant::now()) {
            if let Some(entry) = heap.pop() {
                trace!(order = entry.order, "running timer task");
                (entry.task)();
            }
        }

        let wait = heap
            .peek()
            .map(|next| next.deadline.saturating_duration_since(Instant::now()));

        match (open, wait) {
            (false, None) => break,
            (false, Some(wait)) => thread::sleep(wait),
            (true, None) => match receiver.recv() {
                Ok(entry) => heap.push(entry),
                Err(_) => open = false,
            },
            (true, Some(wait)) => match receiver.recv_timeout(wait) {
                Ok(entry) => heap.push(entry),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => open = false,
            },
        }
    }
    debug!("timer thread stopped");
}

impl Scheduler for TimerThread {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn schedule_at(&self, deadline: Duration, task: Task) {
        let entry = Entry {
            deadline: self.epoch + deadline,
            order: self.next_order.fetch_add(1, AtomicOrdering::Relaxed),
            task,
        };
        if let Some(sender) = &self.sender
            && sender.send(entry).is_err()
        {
            debug!("timer thread gone; task dropped");
        }
    }
}

impl Drop for TimerThread {
    fn drop(&mut self) {
        // Closing the channel tells the worker to finish what is queued and exit
        self.sender.take();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            debug!("timer thread panicked");
        }
    }
}
