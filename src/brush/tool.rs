//! Brush tool binding and the stroke operation body

use crate::block::{BlockState, BlockTypeId};
use crate::core::types::BlockPos;
use crate::core::{EditConfig, Error, Result};
use crate::edit::{EditContext, EditSession, Operation, OperationBody, OperationReport, SpatialTarget, TargetKind};
use crate::pattern::{BlockTypeMask, Mask, Pattern, SingleBlockPattern};
use crate::world::{FixedSelection, WorldAccess};

use super::{Brush, ShapeBrush};

/// Default brush size
pub const DEFAULT_BRUSH_SIZE: f64 = 2.0;

/// One use of a brush at the placement point
#[derive(Debug)]
pub struct BrushStroke {
    brush: Box<dyn Brush>,
    pattern: Box<dyn Pattern>,
    size: f64,
}

impl BrushStroke {
    pub fn new(brush: Box<dyn Brush>, pattern: Box<dyn Pattern>, size: f64) -> Self {
        Self { brush, pattern, size }
    }
}

impl OperationBody for BrushStroke {
    fn name(&self) -> &'static str {
        self.brush.name()
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::Point
    }

    fn execute(&mut self, target: &SpatialTarget, edit: &mut EditContext<'_>) -> Result<()> {
        let pos = target
            .point()
            .ok_or_else(|| Error::IncompleteSelection("brush stroke needs a target block".into()))?;
        self.brush.build(edit, pos, &mut *self.pattern, self.size)
    }
}

/// A brush bound to a pattern, a size and an optional mask
#[derive(Debug)]
pub struct BrushTool {
    brush: Box<dyn Brush>,
    pattern: Box<dyn Pattern>,
    size: f64,
    mask: Option<Box<dyn Mask>>,
}

impl BrushTool {
    pub fn new(brush: impl Brush + 'static, pattern: impl Pattern + 'static) -> Self {
        Self {
            brush: Box::new(brush),
            pattern: Box::new(pattern),
            size: DEFAULT_BRUSH_SIZE,
            mask: None,
        }
    }

    /// Sphere of air that only removes `fire` blocks
    pub fn extinguisher(radius: f64, fire: BlockTypeId) -> Self {
        Self::new(ShapeBrush::sphere(), SingleBlockPattern::new(BlockState::AIR))
            .with_size(radius)
            .with_mask(BlockTypeMask::new([fire]))
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_mask(mut self, mask: impl Mask + 'static) -> Self {
        self.mask = Some(Box::new(mask));
        self
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn brush_name(&self) -> &'static str {
        self.brush.name()
    }

    /// Turn the tool into an operation, checking the size against the
    /// configured ceiling
    pub fn stroke(self, config: &EditConfig) -> Result<Operation> {
        if self.size > config.max_brush_radius {
            return Err(Error::BrushTooLarge {
                radius: self.size,
                max: config.max_brush_radius,
            });
        }
        let body = BrushStroke::new(self.brush, self.pattern, self.size);
        Ok(Operation::new(body).with_boxed_mask(self.mask))
    }

    /// Stroke at `target` through `session`
    pub fn apply<W: WorldAccess>(self, session: &mut EditSession<W>, target: BlockPos) -> Result<OperationReport> {
        let op = self.stroke(session.config())?.with_target(SpatialTarget::Point(target));
        session.run(op, &FixedSelection::none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::demo_ids::*;
    use crate::block::SimpleCatalog;
    use crate::brush::{GravityBrush, SmoothBrush};
    use crate::world::MemoryWorld;

    fn session(world: MemoryWorld) -> EditSession<MemoryWorld> {
        EditSession::new(world, SimpleCatalog::demo(), EditConfig::default()).unwrap()
    }

    #[test]
    fn test_sphere_stroke() {
        let mut session = session(MemoryWorld::default());
        let tool = BrushTool::new(ShapeBrush::sphere(), SingleBlockPattern::new(BlockState::new(WOOL))).with_size(1.0);
        let report = tool.apply(&mut session, BlockPos::new(0, 10, 0)).unwrap();

        assert_eq!(report.name, "sphere_brush");
        assert_eq!(report.changed_blocks, 7);
        assert_eq!(session.world().block_type(BlockPos::new(0, 11, 0)), WOOL);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_size_above_ceiling_rejected() {
        let mut session = session(MemoryWorld::default());
        let tool = BrushTool::new(GravityBrush::new(), SingleBlockPattern::new(BlockState::AIR)).with_size(7.0);
        let err = tool.apply(&mut session, BlockPos::new(0, 10, 0)).unwrap_err();

        assert!(matches!(err, Error::BrushTooLarge { radius, max } if radius == 7.0 && max == 6.0));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_extinguisher_only_clears_fire() {
        let mut world = MemoryWorld::default();
        world.place(BlockPos::new(0, 10, 0), BlockState::new(FIRE));
        world.place(BlockPos::new(1, 10, 0), BlockState::new(STONE));
        world.place(BlockPos::new(0, 11, 0), BlockState::new(FIRE));
        let before = world.snapshot();
        let mut session = session(world);

        let report = BrushTool::extinguisher(2.0, FIRE)
            .apply(&mut session, BlockPos::new(0, 10, 0))
            .unwrap();

        assert_eq!(report.stats.applied, 2);
        assert!(session.world().block(BlockPos::new(0, 10, 0)).is_air());
        assert!(session.world().block(BlockPos::new(0, 11, 0)).is_air());
        assert_eq!(session.world().block_type(BlockPos::new(1, 10, 0)), STONE);
        let after = session.world().snapshot();

        session.undo(1).unwrap();
        assert_eq!(session.world().snapshot(), before);
        session.redo(1).unwrap();
        assert_eq!(session.world().snapshot(), after);
    }

    #[test]
    fn test_stroke_is_undoable() {
        let mut world = MemoryWorld::default();
        for x in -3..=3 {
            for z in -3..=3 {
                world.place_column(x, z, 0, 5, &BlockState::new(DIRT));
            }
        }
        world.place_column(0, 0, 6, 12, &BlockState::new(DIRT));
        let before = world.snapshot();
        let mut session = session(world);

        BrushTool::new(SmoothBrush::new(1), SingleBlockPattern::new(BlockState::AIR))
            .with_size(3.0)
            .apply(&mut session, BlockPos::new(0, 6, 0))
            .unwrap();
        assert_ne!(session.world().snapshot(), before);

        assert_eq!(session.undo(1).unwrap(), 1);
        assert_eq!(session.world().snapshot(), before);
    }
}
