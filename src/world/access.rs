//! World adapter capability set

use crate::block::{BlockState, BlockTypeId};
use crate::core::types::BlockPos;
use crate::world::chunk::ColumnCoord;

/// Read/write access to the block grid of one world.
///
/// Implementations apply a write exactly as asked; ordering, validation and
/// resource accounting are the engine's job.
pub trait WorldAccess {
    /// Current block at a position, including payload
    fn block(&self, pos: BlockPos) -> BlockState;

    fn block_type(&self, pos: BlockPos) -> BlockTypeId {
        self.block(pos).type_id
    }

    fn block_data(&self, pos: BlockPos) -> u8 {
        self.block(pos).data
    }

    /// Store a block. `fast` skips neighbor/lighting updates; those are
    /// repaired later by [`WorldAccess::fix_up_chunks`]. Returns whether the
    /// stored value changed.
    fn set_block_state(&mut self, pos: BlockPos, state: &BlockState, fast: bool) -> bool;

    fn is_valid_block_type(&self, type_id: BlockTypeId) -> bool;

    /// Whether the variant data of this type is meaningful
    fn uses_variant_data(&self, type_id: BlockTypeId) -> bool;

    fn ensure_chunk_loaded(&mut self, pos: BlockPos);

    /// Drop the stored contents of a container so overwriting it spills nothing
    fn clear_container_contents(&mut self, pos: BlockPos);

    /// Highest valid Y coordinate (lowest is 0)
    fn max_y(&self) -> i32;

    /// Repair state of chunks written in fast mode
    fn fix_up_chunks(&mut self, chunks: &[ColumnCoord]);
}
