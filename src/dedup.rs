//! Exact duplicate-row suppression.
//!
//! Deduplication is opt-in. When disabled the check short-circuits: nothing is
//! recorded, nothing is counted, every row passes. When enabled, a row equal in
//! every position to an earlier row is reported as a duplicate; the first
//! occurrence is the one that survives.
//!
//! The deduplicator is owned by the producer thread only, so it needs no
//! synchronization.

use crate::record::RawRow;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct Deduplicator {
    enabled: bool,
    seen: HashSet<RawRow>,
    duplicates: u64,
}

impl Deduplicator {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// `true` if `row` repeats a row seen earlier in this run.
    ///
    /// Unseen rows are recorded. Always `false` when disabled.
    pub fn is_duplicate(&mut self, row: &RawRow) -> bool {
        if !self.enabled {
            return false;
        }
        if self.seen.contains(row) {
            self.duplicates += 1;
            tracing::trace!(?row, "duplicate row");
            return true;
        }
        self.seen.insert(row.clone());
        false
    }

    /// Number of rows reported as duplicates so far.
    #[must_use]
    pub const fn duplicates(&self) -> u64 {
        self.duplicates
    }

    /// Number of distinct rows recorded so far.
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.seen.len()
    }
}
