//! Inclusive integer cuboid

use serde::{Deserialize, Serialize};

use crate::core::types::{BlockPos, IVec3};

/// Axis-aligned block region defined by inclusive min and max corners
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CuboidRegion {
    pub min: BlockPos,
    pub max: BlockPos,
}

impl CuboidRegion {
    /// Create region from two arbitrary corners
    pub fn new(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create region from center and half-extents (in blocks)
    pub fn from_center_half_extent(center: BlockPos, half_extent: IVec3) -> Self {
        Self::new(center - half_extent, center + half_extent)
    }

    /// Number of blocks along X
    pub fn width(&self) -> usize {
        (self.max.x - self.min.x + 1) as usize
    }

    /// Number of blocks along Z
    pub fn length(&self) -> usize {
        (self.max.z - self.min.z + 1) as usize
    }

    /// Clamp vertical extent to `[min_y, max_y]`
    pub fn clamp_y(&self, min_y: i32, max_y: i32) -> Self {
        let mut out = *self;
        out.min.y = out.min.y.clamp(min_y, max_y);
        out.max.y = out.max.y.clamp(min_y, max_y);
        out
    }

    /// Iterate every position, X outermost then Y then Z
    pub fn iter(&self) -> impl Iterator<Item = BlockPos> + '_ {
        let (min, max) = (self.min, self.max);
        (min.x..=max.x).flat_map(move |x| {
            (min.y..=max.y).flat_map(move |y| (min.z..=max.z).map(move |z| IVec3::new(x, y, z)))
        })
    }
}
