//! Shared counter backing the badges shown across views

use std::sync::Arc;
use tokio::sync::watch;

/// Non-negative session counter.
///
/// Clones share the same value. Reads are synchronous and always see the
/// latest write; views that want to react to changes hold a receiver from
/// [`SharedCounter::subscribe`]. Only the session and its services write:
///
/// ```compile_fail
/// let badge = elidune_portal::session::SharedCounter::default();
/// badge.increment();
/// ```
#[derive(Debug, Clone)]
pub struct SharedCounter {
    tx: Arc<watch::Sender<u64>>,
}

impl SharedCounter {
    pub fn new(initial: u64) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn read(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Add one and return the new value
    pub(crate) fn increment(&self) -> u64 {
        let mut value = 0;
        self.tx.send_modify(|n| {
            *n = n.saturating_add(1);
            value = *n;
        });
        value
    }

    /// Remove one, clamping at zero. Returns whether the value changed.
    pub(crate) fn decrement(&self) -> bool {
        self.tx.send_if_modified(|n| {
            if *n == 0 {
                return false;
            }
            *n -= 1;
            true
        })
    }

    pub(crate) fn set(&self, value: u64) {
        self.tx.send_if_modified(|n| {
            let changed = *n != value;
            *n = value;
            changed
        });
    }

    /// Receiver notified on every change, for badge views
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

impl Default for SharedCounter {
    fn default() -> Self {
        Self::new(0)
    }
}
