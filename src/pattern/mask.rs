//! Position masks restricting where writes land

use std::collections::HashSet;

use crate::block::BlockTypeId;
use crate::core::types::BlockPos;
use crate::world::WorldAccess;

/// Decides, against the current world, whether a position may be written
pub trait Mask: std::fmt::Debug {
    fn matches(&self, world: &dyn WorldAccess, pos: BlockPos) -> bool;
}

/// Matches positions currently holding one of the listed types
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockTypeMask {
    types: HashSet<BlockTypeId>,
}

impl BlockTypeMask {
    pub fn new(types: impl IntoIterator<Item = BlockTypeId>) -> Self {
        Self {
            types: types.into_iter().collect(),
        }
    }
}

impl Mask for BlockTypeMask {
    fn matches(&self, world: &dyn WorldAccess, pos: BlockPos) -> bool {
        self.types.contains(&world.block_type(pos))
    }
}

/// Matches any non-air position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExistingBlockMask;

impl Mask for ExistingBlockMask {
    fn matches(&self, world: &dyn WorldAccess, pos: BlockPos) -> bool {
        !world.block(pos).is_air()
    }
}

/// Negates another mask
#[derive(Debug)]
pub struct InvertMask(pub Box<dyn Mask>);

impl Mask for InvertMask {
    fn matches(&self, world: &dyn WorldAccess, pos: BlockPos) -> bool {
        !self.0.matches(world, pos)
    }
}
