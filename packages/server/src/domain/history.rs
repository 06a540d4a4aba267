//! Bounded replay history of broadcast messages.

use std::collections::VecDeque;

use super::entity::HistoryEntry;

/// Append-only log of broadcast messages with FIFO eviction.
///
/// Invariants: `len() <= capacity()` at all times; insertion order is
/// preserved; overflowing pushes silently drop the oldest entry. Private
/// messages are never recorded here.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest one once the buffer is full
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Owned copy of the current entries, oldest first.
    ///
    /// The copy is safe to hand to a joining session without holding any
    /// lock while it is transmitted.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
