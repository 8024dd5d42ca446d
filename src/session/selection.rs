//! Pending selection for the in-library reading request

use indexmap::IndexSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::counter::SharedCounter;
use crate::models::ItemId;

/// Ordered set of items picked for a reading request but not yet submitted.
///
/// Its size is mirrored into a [`SharedCounter`] for the cart badge; a
/// non-empty set arms the navigation guard.
#[derive(Debug, Clone, Default)]
pub struct PendingSelection {
    items: Arc<Mutex<IndexSet<ItemId>>>,
    count: SharedCounter,
}

impl PendingSelection {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, IndexSet<ItemId>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns false when the item was already selected
    pub(crate) fn insert(&self, id: ItemId) -> bool {
        let mut items = self.lock();
        let inserted = items.insert(id);
        self.count.set(items.len() as u64);
        inserted
    }

    pub(crate) fn remove(&self, id: ItemId) -> bool {
        let mut items = self.lock();
        let removed = items.shift_remove(&id);
        self.count.set(items.len() as u64);
        removed
    }

    /// Empty the selection, returning how many items were dropped
    pub(crate) fn clear(&self) -> usize {
        let mut items = self.lock();
        let dropped = items.len();
        items.clear();
        self.count.set(0);
        dropped
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.lock().contains(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Selected items in selection order
    pub fn items(&self) -> Vec<ItemId> {
        self.lock().iter().copied().collect()
    }

    pub fn counter(&self) -> &SharedCounter {
        &self.count
    }
}
