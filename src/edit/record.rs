//! Insertion-ordered position -> block mapping

use std::collections::HashMap;

use serde::ser::{Serialize, Serializer};

use crate::block::BlockState;
use crate::core::types::BlockPos;

/// Below this many slots tombstones are never compacted
const COMPACT_MIN_SLOTS: usize = 64;

/// Map from position to block state that remembers first-insertion order.
///
/// Entries live in an arena; a position index points into it. Removal leaves
/// a tombstone so iteration order stays stable, and the arena is compacted
/// once more than half of it is dead.
#[derive(Clone, Debug, Default)]
pub struct MutationRecord {
    slots: Vec<Option<(BlockPos, BlockState)>>,
    index: HashMap<BlockPos, usize>,
}

impl MutationRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, pos: BlockPos) -> bool {
        self.index.contains_key(&pos)
    }

    pub fn get(&self, pos: BlockPos) -> Option<&BlockState> {
        let slot = *self.index.get(&pos)?;
        self.slots[slot].as_ref().map(|(_, state)| state)
    }

    /// Store only if the position has no entry yet. Returns whether it stored.
    pub fn insert_if_absent(&mut self, pos: BlockPos, state: BlockState) -> bool {
        if self.index.contains_key(&pos) {
            return false;
        }
        self.push(pos, state);
        true
    }

    /// Store, overwriting in place. Returns the previous value.
    pub fn insert(&mut self, pos: BlockPos, state: BlockState) -> Option<BlockState> {
        match self.index.get(&pos) {
            Some(&slot) => self.slots[slot]
                .replace((pos, state))
                .map(|(_, previous)| previous),
            None => {
                self.push(pos, state);
                None
            }
        }
    }

    /// Remove an entry, keeping the order of the others
    pub fn remove(&mut self, pos: BlockPos) -> Option<BlockState> {
        let slot = self.index.remove(&pos)?;
        let removed = self.slots[slot].take().map(|(_, state)| state);
        self.compact_if_sparse();
        removed
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (BlockPos, &BlockState)> + '_ {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|(pos, state)| (*pos, state)))
    }

    /// Positions in insertion order
    pub fn positions(&self) -> impl DoubleEndedIterator<Item = BlockPos> + '_ {
        self.iter().map(|(pos, _)| pos)
    }

    /// Move all entries out in insertion order, leaving the record empty
    pub fn take(&mut self) -> Vec<(BlockPos, BlockState)> {
        self.index.clear();
        std::mem::take(&mut self.slots).into_iter().flatten().collect()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
    }

    fn push(&mut self, pos: BlockPos, state: BlockState) {
        self.index.insert(pos, self.slots.len());
        self.slots.push(Some((pos, state)));
    }

    fn compact_if_sparse(&mut self) {
        if self.slots.len() < COMPACT_MIN_SLOTS || self.index.len() * 2 >= self.slots.len() {
            return;
        }
        self.slots.retain(Option::is_some);
        for (slot, entry) in self.slots.iter().enumerate() {
            if let Some((pos, _)) = entry {
                self.index.insert(*pos, slot);
            }
        }
    }
}

impl Serialize for MutationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl FromIterator<(BlockPos, BlockState)> for MutationRecord {
    fn from_iter<I: IntoIterator<Item = (BlockPos, BlockState)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (pos, state) in iter {
            record.insert(pos, state);
        }
        record
    }
}
