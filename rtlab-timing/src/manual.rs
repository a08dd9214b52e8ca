use std::time::Duration;

use crate::clock::{deadline_after, CancelToken, Fired, TimerQueue, TrialClock};

/// Virtual clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock<E> {
    now_ns: u64,
    queue: TimerQueue<E>,
}

impl<E> ManualClock<E> {
    pub fn new() -> Self {
        Self {
            now_ns: 0,
            queue: TimerQueue::new(),
        }
    }

    pub fn advance(&mut self, d: Duration) {
        self.now_ns = deadline_after(self.now_ns, d);
    }

    /// Jumps to the earliest pending deadline. Returns false if nothing is
    /// scheduled.
    pub fn advance_to_next(&mut self) -> bool {
        match self.queue.next_deadline() {
            Some(deadline) => {
                self.now_ns = self.now_ns.max(deadline);
                true
            }
            None => false,
        }
    }
}

impl<E> Default for ManualClock<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TrialClock<E> for ManualClock<E> {
    fn now_ns(&self) -> u64 {
        self.now_ns
    }

    fn schedule(&mut self, delay: Duration, item: E) -> CancelToken {
        self.queue.insert(deadline_after(self.now_ns, delay), item)
    }

    fn cancel(&mut self, token: CancelToken) -> bool {
        self.queue.cancel(token)
    }

    fn pop_due(&mut self) -> Option<Fired<E>> {
        self.queue.pop_due(self.now_ns)
    }

    fn next_deadline_ns(&self) -> Option<u64> {
        self.queue.next_deadline()
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}
