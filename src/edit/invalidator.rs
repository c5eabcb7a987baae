//! Chunk column tracking for blocks written in fast mode.

use std::collections::HashSet;

use crate::core::types::BlockPos;
use crate::world::ColumnCoord;

/// Tracks which chunk columns need a fix-up pass after fast writes.
///
/// Fast writes skip the world's neighbor and lighting updates. Every column
/// they touch is collected here and handed to the world in one batch once a
/// commit band finishes.
#[derive(Debug, Default)]
pub struct ChunkInvalidator {
    /// Columns waiting for fix-up
    dirty_columns: HashSet<ColumnCoord>,
}

impl ChunkInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the column containing a block position.
    pub fn mark_block(&mut self, pos: BlockPos) {
        self.dirty_columns.insert(ColumnCoord::from_block(pos));
    }

    /// Take all dirty columns, sorted, and clear the dirty list.
    pub fn take_dirty_columns(&mut self) -> Vec<ColumnCoord> {
        let mut columns: Vec<_> = self.dirty_columns.drain().collect();
        columns.sort_unstable();
        columns
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty_columns.is_empty()
    }
}
