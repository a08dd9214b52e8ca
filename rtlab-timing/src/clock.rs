use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle to one scheduled item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CancelToken(u64);

impl CancelToken {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// A scheduled item whose deadline has passed
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<E> {
    pub token: CancelToken,
    pub deadline_ns: u64,
    pub item: E,
}

/// Source of time plus a queue of cancellable, one-shot items
pub trait TrialClock<E> {
    /// Monotonic nanoseconds since the clock was created.
    fn now_ns(&self) -> u64;

    /// Schedules `item` to become due after `delay`.
    fn schedule(&mut self, delay: Duration, item: E) -> CancelToken;

    /// Removes a pending item. Returns false if it already fired or was
    /// cancelled before; calling it again is harmless.
    fn cancel(&mut self, token: CancelToken) -> bool;

    /// Removes and returns the earliest item that is due now.
    fn pop_due(&mut self) -> Option<Fired<E>>;

    fn next_deadline_ns(&self) -> Option<u64>;

    fn pending(&self) -> usize;
}

/// Deadline-ordered storage shared by the clock implementations
#[derive(Debug)]
pub struct TimerQueue<E> {
    entries: BTreeMap<(u64, u64), E>,
    deadlines: HashMap<CancelToken, u64>,
    next_id: u64,
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            deadlines: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn insert(&mut self, deadline_ns: u64, item: E) -> CancelToken {
        let token = CancelToken(self.next_id);
        self.next_id += 1;
        self.entries.insert((deadline_ns, token.0), item);
        self.deadlines.insert(token, deadline_ns);
        token
    }

    pub fn cancel(&mut self, token: CancelToken) -> bool {
        match self.deadlines.remove(&token) {
            Some(deadline) => self.entries.remove(&(deadline, token.0)).is_some(),
            None => false,
        }
    }

    /// Items sharing a deadline come out in scheduling order.
    pub fn pop_due(&mut self, now_ns: u64) -> Option<Fired<E>> {
        let (&(deadline_ns, _), _) = self.entries.first_key_value()?;
        if deadline_ns > now_ns {
            return None;
        }
        let ((deadline_ns, id), item) = self.entries.pop_first()?;
        let token = CancelToken(id);
        self.deadlines.remove(&token);
        Some(Fired {
            token,
            deadline_ns,
            item,
        })
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.keys().next().map(|&(deadline, _)| deadline)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn deadline_after(now_ns: u64, delay: Duration) -> u64 {
    now_ns.saturating_add(delay.as_nanos().min(u64::MAX as u128) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.insert(30, "c");
        q.insert(10, "a");
        q.insert(20, "b");
        assert!(q.pop_due(5).is_none());
        let order: Vec<_> = std::iter::from_fn(|| q.pop_due(100)).map(|f| f.item).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn equal_deadlines_keep_scheduling_order() {
        let mut q = TimerQueue::new();
        q.insert(10, 1);
        q.insert(10, 2);
        assert_eq!(q.pop_due(10).map(|f| f.item), Some(1));
        assert_eq!(q.pop_due(10).map(|f| f.item), Some(2));
    }

    #[test]
    fn cancel_is_idempotent_and_noop_after_fire() {
        let mut q = TimerQueue::new();
        let a = q.insert(10, ());
        let b = q.insert(20, ());
        assert!(q.cancel(a));
        assert!(!q.cancel(a));
        let fired = q.pop_due(25).unwrap();
        assert_eq!(fired.token, b);
        assert!(!q.cancel(b));
        assert!(q.is_empty());
    }
}
