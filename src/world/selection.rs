//! Session selection lookup

use crate::core::types::BlockPos;
use crate::core::{Error, Result};
use crate::math::CuboidRegion;

/// Supplies the spatial target of an operation when it initializes
pub trait SelectionResolver {
    /// The active region selection
    fn resolve_region(&self) -> Result<CuboidRegion>;

    /// The point an edit should be centered on
    fn resolve_placement_point(&self) -> Result<BlockPos>;
}

/// Resolver backed by fixed values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedSelection {
    pub region: Option<CuboidRegion>,
    pub point: Option<BlockPos>,
}

impl FixedSelection {
    /// Nothing selected
    pub fn none() -> Self {
        Self::default()
    }

    pub fn region(region: CuboidRegion) -> Self {
        Self { region: Some(region), point: None }
    }

    pub fn point(point: BlockPos) -> Self {
        Self { region: None, point: Some(point) }
    }
}

impl SelectionResolver for FixedSelection {
    fn resolve_region(&self) -> Result<CuboidRegion> {
        self.region
            .ok_or_else(|| Error::IncompleteSelection("no region selected".into()))
    }

    fn resolve_placement_point(&self) -> Result<BlockPos> {
        self.point
            .ok_or_else(|| Error::IncompleteSelection("no placement position".into()))
    }
}
