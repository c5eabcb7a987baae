//! Terrain height resampling.
//!
//! Column heights of a region are read into a 2-D map, filtered, and every
//! column whose height changed is stretched or compressed to the new height
//! by nearest-neighbor resampling of its original contents.

use crate::block::{BlockCatalog, BlockState};
use crate::core::types::{BlockPos, IVec3};
use crate::core::{Error, Result};
use crate::edit::{EditContext, OperationBody, SpatialTarget, TargetKind};
use crate::math::CuboidRegion;
use crate::ops::kernel::HeightMapFilter;
use crate::world::WorldAccess;

/// Highest Y in `[min_y, max_y]` holding terrain, or `min_y` if none.
///
/// Terrain is any non-passable block, or only natural terrain blocks when
/// `natural_only` is set.
pub fn highest_terrain_block(
    world: &dyn WorldAccess,
    catalog: &dyn BlockCatalog,
    x: i32,
    z: i32,
    min_y: i32,
    max_y: i32,
    natural_only: bool,
) -> i32 {
    (min_y..=max_y)
        .rev()
        .find(|&y| {
            let type_id = world.block_type(IVec3::new(x, y, z));
            if natural_only {
                catalog.is_natural_terrain(type_id)
            } else {
                !catalog.can_pass_through(type_id)
            }
        })
        .unwrap_or(min_y)
}

/// Filter the height map of `region` and rewrite the columns that moved.
/// Returns the number of columns rewritten.
pub fn resample_heights(
    edit: &mut EditContext<'_>,
    region: &CuboidRegion,
    filter: &HeightMapFilter,
    iterations: usize,
    natural_only: bool,
) -> Result<usize> {
    let min = region.min;
    let min_y = min.y;
    let max_y = region.max.y;
    let width = region.width();
    let length = region.length();

    let mut heights = Vec::with_capacity(width * length);
    for z in 0..length as i32 {
        for x in 0..width as i32 {
            heights.push(highest_terrain_block(
                edit.world(),
                edit.catalog(),
                min.x + x,
                min.z + z,
                min_y,
                max_y,
                natural_only,
            ));
        }
    }

    let filtered = filter.filter_n(&heights, width, length, iterations);

    let mut rewritten = 0;
    for (index, (&old, &new)) in heights.iter().zip(&filtered).enumerate() {
        let x = min.x + (index % width) as i32;
        let z = min.z + (index / width) as i32;
        if rewrite_column(edit, x, z, min_y, old, new.min(max_y))? {
            rewritten += 1;
        }
    }

    log::debug!("Resampled {} of {} columns", rewritten, heights.len());
    Ok(rewritten)
}

/// Stretch or compress one column from `old` to `new` height
fn rewrite_column(edit: &mut EditContext<'_>, x: i32, z: i32, min_y: i32, old: i32, new: i32) -> Result<bool> {
    if new == old || new == min_y {
        return Ok(false);
    }

    let at = |y: i32| BlockPos::new(x, y, z);
    let scale = (old - min_y) as f64 / (new - min_y) as f64;
    let source = |y: i32| min_y + (y as f64 * scale).floor() as i32;

    if new > old {
        let top = edit.block(at(old));
        if edit.catalog().is_liquid(top.type_id) {
            return Ok(false);
        }
        edit.set_block(at(new), top)?;

        for y in (0..new - min_y).rev() {
            let state = edit.block(at(source(y)));
            edit.set_block(at(min_y + y), state)?;
        }
    } else {
        for y in 0..new - min_y {
            let state = edit.block(at(source(y)));
            edit.set_block(at(min_y + y), state)?;
        }

        let top = edit.block(at(old));
        edit.set_block(at(new), top)?;

        for y in new + 1..=old {
            edit.set_block(at(y), BlockState::AIR)?;
        }
    }
    Ok(true)
}

/// Smooths or otherwise reshapes the terrain of the selected region
#[derive(Debug)]
pub struct HeightResample {
    filter: HeightMapFilter,
    iterations: usize,
    natural_only: bool,
}

impl HeightResample {
    pub fn new(filter: HeightMapFilter, iterations: usize) -> Self {
        Self {
            filter,
            iterations,
            natural_only: false,
        }
    }

    /// Only count natural terrain blocks when measuring heights (builder pattern)
    pub fn natural_only(mut self, natural_only: bool) -> Self {
        self.natural_only = natural_only;
        self
    }
}

impl OperationBody for HeightResample {
    fn name(&self) -> &'static str {
        "height_resample"
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::Region
    }

    fn execute(&mut self, target: &SpatialTarget, edit: &mut EditContext<'_>) -> Result<()> {
        let region = target
            .region()
            .ok_or_else(|| Error::IncompleteSelection("height resample needs a region".into()))?;
        resample_heights(edit, region, &self.filter, self.iterations, self.natural_only)?;
        Ok(())
    }
}
