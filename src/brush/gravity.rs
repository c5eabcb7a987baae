//! Gravity brush: drops floating blocks within the footprint

use crate::block::BlockState;
use crate::core::types::BlockPos;
use crate::core::Result;
use crate::edit::EditContext;
use crate::pattern::Pattern;

use super::Brush;

/// Compacts the non-air blocks of every column in the footprint downward,
/// keeping their vertical order. The pattern is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GravityBrush {
    full_height: bool,
}

impl GravityBrush {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan from the world ceiling instead of the top of the brush (builder pattern)
    pub fn full_height(mut self, full_height: bool) -> Self {
        self.full_height = full_height;
        self
    }

    fn settle_column(&self, edit: &mut EditContext<'_>, x: i32, z: i32, below: i32, top: i32) -> Result<()> {
        let at = |y: i32| BlockPos::new(x, y, z);
        let lowest = (below + 1).max(0);
        if top < lowest {
            return Ok(());
        }

        // Reads see the world, not pending writes, so the column is laid out
        // in full before any write is issued.
        let blocks: Vec<BlockState> = (lowest..=top)
            .map(|y| edit.block(at(y)))
            .filter(|state| !state.is_air())
            .collect();

        let start = if below >= 0 && edit.block(at(below)).is_air() {
            below
        } else {
            lowest
        };

        for y in start..=top {
            let wanted = blocks
                .get((y - start) as usize)
                .cloned()
                .unwrap_or(BlockState::AIR);
            if edit.block(at(y)) != wanted {
                edit.set_block(at(y), wanted)?;
            }
        }
        Ok(())
    }
}

impl Brush for GravityBrush {
    fn name(&self) -> &'static str {
        "gravity_brush"
    }

    fn build(&mut self, edit: &mut EditContext<'_>, pos: BlockPos, _pattern: &mut dyn Pattern, size: f64) -> Result<()> {
        let max_y = edit.max_y();
        let top = if self.full_height {
            max_y
        } else {
            (pos.y as f64 + size).floor().min(max_y as f64) as i32
        };
        let below = (pos.y as f64 - size).floor() as i32;

        for x in footprint(pos.x, size) {
            for z in footprint(pos.z, size) {
                self.settle_column(edit, x, z, below, top)?;
            }
        }
        Ok(())
    }
}

/// Block coordinates in `(center - size, center + size]`
fn footprint(center: i32, size: f64) -> std::ops::RangeInclusive<i32> {
    let center = center as f64;
    ((center - size).floor() as i32 + 1)..=((center + size).floor() as i32)
}
