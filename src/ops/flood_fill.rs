//! Bounded flood fill from a seed position.

use std::collections::HashSet;

use crate::core::types::{BlockPos, IVec3};
use crate::core::{Error, Result};
use crate::edit::{EditContext, OperationBody, SpatialTarget, TargetKind};
use crate::math::Direction;
use crate::pattern::Pattern;

/// How the fill spreads
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillMode {
    /// Spread in all six directions through air within a sphere, never above
    /// the seed
    Recursive,
    /// Spread horizontally within a disc; each reached column is poured from
    /// the seed height down to `depth` blocks until it hits something
    Column,
}

/// Fills connected air around the placement point
#[derive(Debug)]
pub struct FloodFill {
    pattern: Box<dyn Pattern>,
    radius: f64,
    depth: i32,
    mode: FillMode,
}

impl FloodFill {
    pub fn new(pattern: impl Pattern + 'static, radius: f64, depth: i32, mode: FillMode) -> Self {
        Self {
            pattern: Box::new(pattern),
            radius,
            depth,
            mode,
        }
    }

    fn fill(&mut self, origin: BlockPos, edit: &mut EditContext<'_>) -> Result<()> {
        let radius_sq = self.radius * self.radius;
        let min_y = origin.y - self.depth + 1;

        let mut visited = HashSet::new();
        let mut stack = vec![origin];

        while let Some(pos) = stack.pop() {
            if pos.y < 0 || pos.y > origin.y || !visited.insert(pos) {
                continue;
            }

            match self.mode {
                FillMode::Recursive => {
                    if distance_sq(origin, pos) > radius_sq || !edit.block(pos).is_air() {
                        continue;
                    }
                    edit.set_pattern(pos, &mut *self.pattern)?;
                    stack.push(pos + Direction::Down.offset());
                    stack.push(pos + Direction::Up.offset());
                }
                FillMode::Column => {
                    let offset = pos - origin;
                    let horizontal_sq = (offset.x * offset.x + offset.z * offset.z) as f64;
                    if horizontal_sq > radius_sq || !edit.block(pos).is_air() {
                        continue;
                    }
                    self.pour(pos.x, origin.y, pos.z, min_y, edit)?;
                }
            }

            for direction in Direction::HORIZONTAL {
                stack.push(pos + direction.offset());
            }
        }
        Ok(())
    }

    /// Fill down from `top` while cells are empty, no lower than `min_y`
    fn pour(&mut self, x: i32, top: i32, z: i32, min_y: i32, edit: &mut EditContext<'_>) -> Result<()> {
        for y in (min_y..=top).rev() {
            let pos = IVec3::new(x, y, z);
            if !edit.block(pos).is_air() {
                break;
            }
            edit.set_pattern(pos, &mut *self.pattern)?;
        }
        Ok(())
    }
}

fn distance_sq(a: BlockPos, b: BlockPos) -> f64 {
    (a - b).length_squared() as f64
}

impl OperationBody for FloodFill {
    fn name(&self) -> &'static str {
        match self.mode {
            FillMode::Recursive => "flood_fill",
            FillMode::Column => "column_fill",
        }
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::Point
    }

    fn execute(&mut self, target: &SpatialTarget, edit: &mut EditContext<'_>) -> Result<()> {
        let origin = target
            .point()
            .ok_or_else(|| Error::IncompleteSelection("flood fill needs a placement position".into()))?;
        self.fill(origin, edit)
    }
}
