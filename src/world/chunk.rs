//! Column chunk coordinates

use crate::core::types::BlockPos;

/// Chunk columns are 16 blocks wide on X and Z
const CHUNK_SHIFT: u32 = 4;

/// Integer coordinate identifying a full-height chunk column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnCoord {
    pub x: i32,
    pub z: i32,
}

impl ColumnCoord {
    /// Create a new column coordinate
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Column containing a block position
    pub fn from_block(pos: BlockPos) -> Self {
        Self {
            x: pos.x >> CHUNK_SHIFT,
            z: pos.z >> CHUNK_SHIFT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::IVec3;

    #[test]
    fn test_from_block() {
        assert_eq!(ColumnCoord::from_block(IVec3::new(0, 64, 15)), ColumnCoord::new(0, 0));
        assert_eq!(ColumnCoord::from_block(IVec3::new(16, 0, 31)), ColumnCoord::new(1, 1));
        // Negative coordinates floor toward -inf
        assert_eq!(ColumnCoord::from_block(IVec3::new(-1, 0, -16)), ColumnCoord::new(-1, -1));
        assert_eq!(ColumnCoord::from_block(IVec3::new(-17, 0, 0)), ColumnCoord::new(-2, 0));
    }
}
