//! Bounded undo history of layer list snapshots.

use std::collections::VecDeque;

use crate::layer::LayerList;

/// Maximum number of snapshots kept.
pub const HISTORY_LIMIT: usize = 20;

/// Stack of layer lists captured before each undoable mutation.
///
/// When full, the oldest snapshot is dropped to make room.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<LayerList>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(HISTORY_LIMIT)
    }
}

impl History {
    /// Creates an empty history holding up to [`HISTORY_LIMIT`] snapshots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty history with a custom cap. Zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Pushes a copy of `list`, evicting the oldest entries past capacity.
    pub fn snapshot(&mut self, list: &LayerList) {
        self.entries.push_back(list.clone());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Pops the most recent snapshot.
    pub fn undo(&mut self) -> Option<LayerList> {
        self.entries.pop_back()
    }

    /// Drops every snapshot.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of snapshots held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of snapshots kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn snapshots(&self) -> impl Iterator<Item = &LayerList> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{Layer, LayerId, TextLayerBuilder};

    fn list_of(n: u64) -> LayerList {
        (1..=n)
            .map(|id| Layer::Text(TextLayerBuilder::new("t").into_layer(LayerId(id))))
            .collect()
    }

    #[test]
    fn undo_returns_latest_first() {
        let mut history = History::new();
        history.snapshot(&list_of(0));
        history.snapshot(&list_of(1));
        assert_eq!(history.undo().map(|l| l.len()), Some(1));
        assert_eq!(history.undo().map(|l| l.len()), Some(0));
        assert!(history.undo().is_none());
    }

    #[test]
    fn oldest_entries_are_evicted() {
        let mut history = History::new();
        for n in 0..25 {
            history.snapshot(&list_of(n));
        }
        assert_eq!(history.len(), HISTORY_LIMIT);
        let lengths: Vec<usize> = history.snapshots().map(LayerList::len).collect();
        assert_eq!(lengths, (5..25).collect::<Vec<usize>>());
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut history = History::new();
        let mut live = list_of(2);
        history.snapshot(&live);
        live.clear();
        assert_eq!(history.undo().unwrap().len(), 2);
    }

    #[test]
    fn clear_discards_everything() {
        let mut history = History::with_capacity(3);
        history.snapshot(&list_of(1));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 3);
    }
}
