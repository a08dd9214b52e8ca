use std::time::{Duration, Instant};

use crate::clock::{deadline_after, CancelToken, Fired, TimerQueue, TrialClock};

/// Wall clock backed by `Instant`, with platform-specific precise sleeps
/// for the thread that drives the engine.
#[derive(Debug)]
pub struct HighPrecisionClock<E> {
    start: Instant,
    queue: TimerQueue<E>,
}

impl<E> TrialClock<E> for HighPrecisionClock<E> {
    fn now_ns(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    fn schedule(&mut self, delay: Duration, item: E) -> CancelToken {
        self.queue.insert(deadline_after(self.now_ns(), delay), item)
    }

    fn cancel(&mut self, token: CancelToken) -> bool {
        self.queue.cancel(token)
    }

    fn pop_due(&mut self) -> Option<Fired<E>> {
        let now = self.now_ns();
        self.queue.pop_due(now)
    }

    fn next_deadline_ns(&self) -> Option<u64> {
        self.queue.next_deadline()
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl<E> HighPrecisionClock<E> {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            queue: TimerQueue::new(),
        }
    }

    /// Sleeps until the earliest pending item is due, but never longer than
    /// `max_wait`. Returns immediately when nothing is scheduled.
    pub fn wait_until_next_due(&self, max_wait: Duration) {
        let Some(deadline) = self.queue.next_deadline() else {
            return;
        };
        let target = deadline.min(deadline_after(self.now_ns(), max_wait));
        loop {
            let now = self.now_ns();
            if now >= target {
                break;
            }
            let wait = Duration::from_nanos(target - now);
            tracing::trace!(wait_us = wait.as_micros() as u64, "sleeping until next deadline");
            self.high_precision_sleep(wait);
        }
    }

    pub fn high_precision_sleep(&self, duration: Duration) {
        #[cfg(target_os = "linux")]
        self.linux_sleep(duration);
        #[cfg(not(target_os = "linux"))]
        std::thread::sleep(duration);
    }

    #[cfg(target_os = "linux")]
    fn linux_sleep(&self, duration: Duration) {
        use libc::{clock_nanosleep, timespec, CLOCK_MONOTONIC};

        let req = timespec {
            tv_sec: duration.as_secs() as libc::time_t,
            tv_nsec: duration.subsec_nanos() as libc::c_long,
        };

        unsafe {
            clock_nanosleep(CLOCK_MONOTONIC, 0, &req, std::ptr::null_mut());
        }
    }
}

impl<E> Default for HighPrecisionClock<E> {
    fn default() -> Self {
        Self::new()
    }
}
