//! Position-indexed result store.
//!
//! The store is an arena of write-once slots. Slot `i` receives the record for
//! the `i`-th data row of the input. Rows that were filtered out before
//! dispatch (duplicates) never touch their slot, so it stays empty and is
//! dropped by [`ResultStore::into_records`].
//!
//! Workers write concurrently, but always to distinct positions, so each slot
//! is a [`OnceLock`] and no per-slot lock is taken. The vector itself is only
//! resized by the producer, before it dispatches a position that does not fit
//! yet; workers hold the read side of the `RwLock` while writing.

use crate::record::TypedRecord;
use std::sync::{OnceLock, PoisonError, RwLock};

#[derive(Debug, Default)]
pub struct ResultStore {
    slots: RwLock<Vec<OnceLock<TypedRecord>>>,
}

impl ResultStore {
    /// Pre-size the store for `expected` rows.
    #[must_use]
    pub fn with_capacity(expected: usize) -> Self {
        let mut slots = Vec::with_capacity(expected);
        slots.resize_with(expected, OnceLock::new);
        Self {
            slots: RwLock::new(slots),
        }
    }

    /// Number of addressable slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Make `position` addressable, growing by doubling when it is not.
    ///
    /// Called by the producer before a unit is dispatched, never by workers.
    pub fn ensure_position(&self, position: usize) {
        if position < self.capacity() {
            return;
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let want = (position + 1).max(slots.len() * 2);
        tracing::debug!(from = slots.len(), to = want, "growing result store");
        slots.resize_with(want, OnceLock::new);
    }

    /// Store the record for `position`.
    ///
    /// # Panics
    /// If `position` was never made addressable or the slot is already
    /// written. Either means the producer handed out a position twice.
    pub fn put(&self, position: usize, record: TypedRecord) {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        let slot = slots
            .get(position)
            .unwrap_or_else(|| panic!("result slot {position} out of range ({})", slots.len()));
        assert!(
            slot.set(record).is_ok(),
            "result slot {position} written twice"
        );
    }

    /// Number of slots that hold a record.
    #[must_use]
    pub fn filled(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| s.get().is_some())
            .count()
    }

    /// Drain the store into the ordered list of records, skipping empty slots.
    ///
    /// Consumes the store, so it can only happen after every worker is done
    /// with it.
    #[must_use]
    pub fn into_records(self) -> Vec<TypedRecord> {
        self.slots
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_iter()
            .filter_map(OnceLock::into_inner)
            .collect()
    }
}
