//! Per-item wishlist membership with in-flight (busy) tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    error::{PortalError, PortalResult},
    models::{ItemId, Membership},
};

#[derive(Debug, Default, Clone, Copy)]
struct Entry {
    membership: Membership,
    busy: bool,
}

/// Source of truth for which items are saved
#[derive(Debug, Clone, Default)]
pub struct MembershipStore {
    entries: Arc<Mutex<HashMap<ItemId, Entry>>>,
}

impl MembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ItemId, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn membership(&self, id: ItemId) -> Membership {
        self.lock().get(&id).map(|e| e.membership).unwrap_or_default()
    }

    pub fn is_busy(&self, id: ItemId) -> bool {
        self.lock().get(&id).is_some_and(|e| e.busy)
    }

    pub fn saved_count(&self) -> usize {
        self.lock().values().filter(|e| e.membership.is_saved()).count()
    }

    pub fn saved_items(&self) -> Vec<ItemId> {
        let mut items: Vec<ItemId> = self
            .lock()
            .iter()
            .filter(|(_, e)| e.membership.is_saved())
            .map(|(id, _)| *id)
            .collect();
        items.sort();
        items
    }

    /// Mark the item busy and write `target` optimistically.
    ///
    /// Returns the membership held before the write.
    pub(crate) fn begin(&self, id: ItemId, target: Membership) -> PortalResult<Membership> {
        let mut entries = self.lock();
        let entry = entries.entry(id).or_default();
        if entry.busy {
            return Err(PortalError::Busy(id));
        }
        let previous = entry.membership;
        entry.membership = target;
        entry.busy = true;
        Ok(previous)
    }

    /// Release the busy flag, leaving the item in `membership`
    pub(crate) fn settle(&self, id: ItemId, membership: Membership) {
        let mut entries = self.lock();
        let entry = entries.entry(id).or_default();
        entry.membership = membership;
        entry.busy = false;
    }

    /// Replace all settled entries with the authoritative saved list.
    ///
    /// Items with a request in flight keep their optimistic state; their own
    /// response settles them.
    pub(crate) fn replace_all(&self, saved: impl IntoIterator<Item = ItemId>) {
        let mut entries = self.lock();
        entries.retain(|_, e| e.busy);
        for id in saved {
            entries.entry(id).or_insert(Entry {
                membership: Membership::Saved,
                busy: false,
            });
        }
    }

    pub(crate) fn clear(&self) {
        self.lock().clear();
    }
}
