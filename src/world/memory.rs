//! In-memory world used by tests, benches and the demo binary

use std::collections::{HashMap, HashSet};

use crate::block::{BlockPayload, BlockState, BlockTypeId};
use crate::core::types::BlockPos;
use crate::world::access::WorldAccess;
use crate::world::chunk::ColumnCoord;

/// Sparse block grid. Absent positions are air.
///
/// Besides storing blocks it records what the engine asked of it (write
/// order, fix-up batches, container clears) so commit behavior can be
/// inspected.
#[derive(Debug)]
pub struct MemoryWorld {
    /// Non-air blocks by position
    blocks: HashMap<BlockPos, BlockState>,
    /// Highest valid Y
    max_y: i32,
    /// Type ids above this are rejected
    max_type_id: BlockTypeId,
    /// Types whose data value is ignored on write
    dataless_types: HashSet<BlockTypeId>,
    /// Columns that have been loaded
    loaded: HashSet<ColumnCoord>,
    /// Every write in application order
    write_log: Vec<(BlockPos, BlockState)>,
    /// Fix-up batches in call order
    fixups: Vec<Vec<ColumnCoord>>,
    /// Positions whose container contents were cleared
    cleared_containers: Vec<BlockPos>,
}

impl MemoryWorld {
    /// Create an empty world with the given height limit
    pub fn new(max_y: i32) -> Self {
        Self {
            blocks: HashMap::new(),
            max_y,
            max_type_id: BlockTypeId::MAX,
            dataless_types: HashSet::new(),
            loaded: HashSet::new(),
            write_log: Vec::new(),
            fixups: Vec::new(),
            cleared_containers: Vec::new(),
        }
    }

    /// Reject every type id above `max` (builder pattern)
    pub fn with_max_type_id(mut self, max: BlockTypeId) -> Self {
        self.max_type_id = max;
        self
    }

    /// Mark a type as not using variant data (builder pattern)
    pub fn without_variant_data(mut self, type_id: BlockTypeId) -> Self {
        self.dataless_types.insert(type_id);
        self
    }

    /// Place a block without going through the edit engine or the write log
    pub fn place(&mut self, pos: BlockPos, state: BlockState) {
        if state.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, state);
        }
    }

    /// Fill a vertical column `[from_y, to_y]` with one block, bypassing the log
    pub fn place_column(&mut self, x: i32, z: i32, from_y: i32, to_y: i32, state: &BlockState) {
        for y in from_y..=to_y {
            self.place(BlockPos::new(x, y, z), state.clone());
        }
    }

    /// Number of non-air blocks
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Snapshot of all non-air blocks
    pub fn snapshot(&self) -> HashMap<BlockPos, BlockState> {
        self.blocks.clone()
    }

    /// Writes applied through [`WorldAccess::set_block_state`], in order
    pub fn write_log(&self) -> &[(BlockPos, BlockState)] {
        &self.write_log
    }

    /// Index of the first logged write at a position
    pub fn write_index(&self, pos: BlockPos) -> Option<usize> {
        self.write_log.iter().position(|(p, _)| *p == pos)
    }

    /// Forget the write log (e.g. after populating a fixture)
    pub fn clear_write_log(&mut self) {
        self.write_log.clear();
    }

    /// Fix-up batches received so far
    pub fn fixups(&self) -> &[Vec<ColumnCoord>] {
        &self.fixups
    }

    /// Positions whose container contents were cleared
    pub fn cleared_containers(&self) -> &[BlockPos] {
        &self.cleared_containers
    }

    /// Whether a column has been loaded
    pub fn is_loaded(&self, coord: ColumnCoord) -> bool {
        self.loaded.contains(&coord)
    }

    /// Highest non-air Y in a column, if any
    pub fn surface_y(&self, x: i32, z: i32) -> Option<i32> {
        (0..=self.max_y).rev().find(|&y| self.blocks.contains_key(&BlockPos::new(x, y, z)))
    }
}

impl Default for MemoryWorld {
    fn default() -> Self {
        Self::new(127)
    }
}

impl WorldAccess for MemoryWorld {
    fn block(&self, pos: BlockPos) -> BlockState {
        self.blocks.get(&pos).cloned().unwrap_or_default()
    }

    fn set_block_state(&mut self, pos: BlockPos, state: &BlockState, _fast: bool) -> bool {
        self.write_log.push((pos, state.clone()));

        let previous = if state.is_air() {
            self.blocks.remove(&pos)
        } else {
            self.blocks.insert(pos, state.clone())
        };
        previous.unwrap_or_default() != *state
    }

    fn is_valid_block_type(&self, type_id: BlockTypeId) -> bool {
        type_id <= self.max_type_id
    }

    fn uses_variant_data(&self, type_id: BlockTypeId) -> bool {
        !self.dataless_types.contains(&type_id)
    }

    fn ensure_chunk_loaded(&mut self, pos: BlockPos) {
        self.loaded.insert(ColumnCoord::from_block(pos));
    }

    fn clear_container_contents(&mut self, pos: BlockPos) {
        self.cleared_containers.push(pos);
        if let Some(state) = self.blocks.get_mut(&pos) {
            if let Some(BlockPayload::Inventory(items)) = state.payload.as_deref_mut() {
                items.clear();
            }
        }
    }

    fn max_y(&self) -> i32 {
        self.max_y
    }

    fn fix_up_chunks(&mut self, chunks: &[ColumnCoord]) {
        self.fixups.push(chunks.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_is_air() {
        let world = MemoryWorld::new(63);
        assert_eq!(world.block_count(), 0);
        assert!(world.block(BlockPos::new(1, 2, 3)).is_air());
        assert_eq!(world.max_y(), 63);
    }

    #[test]
    fn test_set_reports_change() {
        let mut world = MemoryWorld::default();
        let pos = BlockPos::new(0, 10, 0);

        assert!(world.set_block_state(pos, &BlockState::new(1), false));
        assert!(!world.set_block_state(pos, &BlockState::new(1), false));
        assert!(world.set_block_state(pos, &BlockState::AIR, false));
        assert_eq!(world.block_count(), 0);
        assert_eq!(world.write_log().len(), 3);
    }

    #[test]
    fn test_place_bypasses_log() {
        let mut world = MemoryWorld::default();
        world.place_column(2, 3, 0, 4, &BlockState::new(1));
        assert_eq!(world.block_count(), 5);
        assert!(world.write_log().is_empty());
        assert_eq!(world.surface_y(2, 3), Some(4));
        assert_eq!(world.surface_y(0, 0), None);
    }

    #[test]
    fn test_clear_container() {
        let mut world = MemoryWorld::default();
        let pos = BlockPos::new(1, 1, 1);
        let chest = BlockState::new(54).with_payload(BlockPayload::Inventory(vec![
            crate::block::ItemStack { item: 1, count: 64, damage: 0 },
        ]));
        world.place(pos, chest);

        world.clear_container_contents(pos);
        assert_eq!(world.cleared_containers(), &[pos]);
        assert_eq!(
            world.block(pos).payload.as_deref(),
            Some(&BlockPayload::Inventory(Vec::new()))
        );
    }

    #[test]
    fn test_validity_and_variant_data() {
        let world = MemoryWorld::default().with_max_type_id(100).without_variant_data(1);
        assert!(world.is_valid_block_type(100));
        assert!(!world.is_valid_block_type(101));
        assert!(!world.uses_variant_data(1));
        assert!(world.uses_variant_data(35));
    }
}
