//! Solid and hollow shape brushes

use crate::core::types::{BlockPos, DVec3, IVec3};
use crate::core::Result;
use crate::edit::EditContext;
use crate::math::{CuboidRegion, Direction};
use crate::pattern::Pattern;

use super::Brush;

/// Brush shapes with signed distance evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushShape {
    /// Ball of radius `size` around the clicked block
    Sphere,
    /// Disc of radius `size`, `height` layers tall starting at the clicked block
    Cylinder { height: i32 },
}

impl BrushShape {
    /// Signed distance from a block offset to the surface (negative = inside)
    pub fn sdf(&self, offset: IVec3, size: f64) -> f64 {
        match self {
            BrushShape::Sphere => offset.as_dvec3().length() - size,
            BrushShape::Cylinder { height } => {
                let radial = DVec3::new(offset.x as f64, 0.0, offset.z as f64).length() - size;
                // Layers 0..height, measured from the layer centres
                let half = *height as f64 / 2.0;
                let axial = (offset.y as f64 + 0.5 - half).abs() - half;
                radial.max(axial)
            }
        }
    }

    pub fn contains(&self, offset: IVec3, size: f64) -> bool {
        self.sdf(offset, size) <= 0.0
    }

    /// Offsets bounding the shape
    pub fn local_bounds(&self, size: f64) -> CuboidRegion {
        let r = size.floor() as i32;
        match self {
            BrushShape::Sphere => CuboidRegion::from_center_half_extent(IVec3::ZERO, IVec3::splat(r)),
            BrushShape::Cylinder { height } => {
                CuboidRegion::new(IVec3::new(-r, 0, -r), IVec3::new(r, (*height - 1).max(0), r))
            }
        }
    }
}

/// Fills a shape with the tool's pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeBrush {
    shape: BrushShape,
    hollow: bool,
}

impl ShapeBrush {
    pub fn sphere() -> Self {
        Self {
            shape: BrushShape::Sphere,
            hollow: false,
        }
    }

    pub fn cylinder(height: i32) -> Self {
        Self {
            shape: BrushShape::Cylinder { height },
            hollow: false,
        }
    }

    /// Only write the shell of the shape (builder pattern)
    pub fn hollow(mut self) -> Self {
        self.hollow = true;
        self
    }

    pub fn shape(&self) -> BrushShape {
        self.shape
    }

    fn on_shell(&self, offset: IVec3, size: f64) -> bool {
        Direction::ALL
            .iter()
            .any(|dir| !self.shape.contains(offset + dir.offset(), size))
    }
}

impl Brush for ShapeBrush {
    fn name(&self) -> &'static str {
        match (self.shape, self.hollow) {
            (BrushShape::Sphere, false) => "sphere_brush",
            (BrushShape::Sphere, true) => "hollow_sphere_brush",
            (BrushShape::Cylinder { .. }, false) => "cylinder_brush",
            (BrushShape::Cylinder { .. }, true) => "hollow_cylinder_brush",
        }
    }

    fn build(&mut self, edit: &mut EditContext<'_>, pos: BlockPos, pattern: &mut dyn Pattern, size: f64) -> Result<()> {
        for offset in self.shape.local_bounds(size).iter() {
            if !self.shape.contains(offset, size) {
                continue;
            }
            if self.hollow && !self.on_shell(offset, size) {
                continue;
            }
            edit.set_pattern(pos + offset, pattern)?;
        }
        Ok(())
    }
}
