//! Dense fill of a cuboid region

use crate::core::{Error, Result};
use crate::edit::{EditContext, OperationBody, SpatialTarget, TargetKind};
use crate::pattern::Pattern;

/// Writes the pattern into every position of the selected region
#[derive(Debug)]
pub struct RegionFill {
    pattern: Box<dyn Pattern>,
}

impl RegionFill {
    pub fn new(pattern: impl Pattern + 'static) -> Self {
        Self {
            pattern: Box::new(pattern),
        }
    }
}

impl OperationBody for RegionFill {
    fn name(&self) -> &'static str {
        "region_fill"
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::Region
    }

    fn execute(&mut self, target: &SpatialTarget, edit: &mut EditContext<'_>) -> Result<()> {
        let region = target
            .region()
            .ok_or_else(|| Error::IncompleteSelection("region fill needs a region".into()))?;

        for pos in region.iter() {
            edit.set_pattern(pos, &mut *self.pattern)?;
        }
        Ok(())
    }
}
