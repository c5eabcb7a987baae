//! Terrain smoothing brush

use crate::core::types::{BlockPos, IVec3};
use crate::core::Result;
use crate::edit::EditContext;
use crate::math::CuboidRegion;
use crate::ops::{resample_heights, GaussianKernel, HeightMapFilter};
use crate::pattern::Pattern;

use super::Brush;

/// Gaussian-smooths the height map of the cuboid around the clicked block.
/// The pattern is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothBrush {
    iterations: usize,
    natural_only: bool,
}

impl SmoothBrush {
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            natural_only: false,
        }
    }

    /// Measure heights from natural terrain only (builder pattern)
    pub fn natural_only(mut self, natural_only: bool) -> Self {
        self.natural_only = natural_only;
        self
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl Brush for SmoothBrush {
    fn name(&self) -> &'static str {
        "smooth_brush"
    }

    fn build(&mut self, edit: &mut EditContext<'_>, pos: BlockPos, _pattern: &mut dyn Pattern, size: f64) -> Result<()> {
        let settings = edit.config().smooth.clone();
        let r = size.floor() as i32;
        let region = CuboidRegion::new(pos - IVec3::splat(r), pos + IVec3::new(r, r + settings.headroom, r))
            .clamp_y(0, edit.max_y());

        let filter = HeightMapFilter::new(GaussianKernel::new(settings.kernel_radius, settings.sigma));
        let columns = resample_heights(edit, &region, &filter, self.iterations, self.natural_only)?;
        log::debug!("Smooth brush at {} rewrote {} columns", pos, columns);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::demo_ids::*;
    use crate::block::{BlockState, SimpleCatalog};
    use crate::core::EditConfig;
    use crate::edit::{MutationLedger, SessionEnv};
    use crate::ops::highest_terrain_block;
    use crate::pattern::SingleBlockPattern;
    use crate::world::MemoryWorld;

    #[test]
    fn test_smooths_spike_under_brush() {
        let mut world = MemoryWorld::default();
        for x in -6..=6 {
            for z in -6..=6 {
                world.place_column(x, z, 0, 9, &BlockState::new(DIRT));
            }
        }
        world.place_column(0, 0, 10, 20, &BlockState::new(DIRT));

        let mut env = SessionEnv::new(Box::new(SimpleCatalog::demo()), EditConfig::default());
        let mut ledger = MutationLedger::new();
        let mut edit = EditContext::new(&mut world, &mut env, None, &mut ledger);
        let mut pattern = SingleBlockPattern::new(BlockState::new(GLASS));
        SmoothBrush::new(2)
            .build(&mut edit, BlockPos::new(0, 10, 0), &mut pattern, 4.0)
            .unwrap();
        edit.flush();

        let catalog = SimpleCatalog::demo();
        let peak = highest_terrain_block(&world, &catalog, 0, 0, 0, 30, false);
        assert!(peak < 20);
        // Untouched outside the brush footprint
        assert_eq!(highest_terrain_block(&world, &catalog, 6, 6, 0, 30, false), 9);
        // Pattern is never written
        assert!(world.snapshot().values().all(|state| state.type_id != GLASS));
    }
}
