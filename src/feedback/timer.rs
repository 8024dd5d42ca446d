//! Cancellable virtual-time timer queue.
//!
//! Time is a millisecond counter advanced explicitly by the owner, so the
//! same code runs under a real clock driver and under tests that jump
//! forward instantly.

use std::collections::{BTreeMap, HashMap};

/// Handle to a scheduled timer, used to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

/// A timer that came due
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<E> {
    pub token: TimerToken,
    pub at_ms: u64,
    pub event: E,
}

#[derive(Debug)]
pub struct TimerQueue<E> {
    now_ms: u64,
    next_token: u64,
    /// Ordered by fire time, then by scheduling order
    pending: BTreeMap<(u64, TimerToken), E>,
    deadlines: HashMap<TimerToken, u64>,
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_token: 0,
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `event` to fire `delay_ms` after the current time
    pub fn schedule(&mut self, delay_ms: u64, event: E) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        let at_ms = self.now_ms.saturating_add(delay_ms);
        self.pending.insert((at_ms, token), event);
        self.deadlines.insert(token, at_ms);
        token
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        match self.deadlines.remove(&token) {
            Some(at_ms) => self.pending.remove(&(at_ms, token)).is_some(),
            None => false,
        }
    }

    /// Pop the earliest timer due at or before `until_ms`.
    ///
    /// The clock moves to the timer's deadline, so anything scheduled while
    /// handling it is measured from the moment it fired and can still come
    /// due within the same advance.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired<E>> {
        let (&(at_ms, token), _) = self.pending.first_key_value()?;
        if at_ms > until_ms {
            return None;
        }
        let event = self.pending.remove(&(at_ms, token))?;
        self.deadlines.remove(&token);
        self.now_ms = self.now_ms.max(at_ms);
        Some(Fired {
            token,
            at_ms,
            event,
        })
    }

    /// Move the clock forward once every due timer has been popped
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.deadlines.contains_key(&token)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Time until the next timer fires, if any
    pub fn time_to_next(&self) -> Option<u64> {
        self.pending
            .keys()
            .next()
            .map(|(at_ms, _)| at_ms.saturating_sub(self.now_ms))
    }
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}
