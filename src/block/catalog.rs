//! Placement rules of a block catalog.
//!
//! The engine never hard-codes block kinds. Whatever catalog the host world
//! uses is exposed through [`BlockCatalog`], which answers the handful of
//! questions commit ordering and terrain detection need: which pending band a
//! type belongs to, which neighbor an oriented block hangs from, and whether a
//! type counts as ground.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::block::state::{BlockState, BlockTypeId, AIR};
use crate::core::Result;
use crate::math::Direction;

/// Commit class of a block type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementClass {
    /// Independent blocks, committed first
    #[default]
    Normal,
    /// Delicate fixtures resting on a solid neighbor (torches, levers)
    Late,
    /// Blocks whose attachment may itself be pending (doors, signs, reeds)
    Final,
}

/// How an oriented block picks the neighbor it is attached to
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentRule {
    /// Not attached to anything
    #[default]
    Free,
    /// Always attached in one direction
    Fixed(Direction),
    /// Direction chosen by `data & mask`; unlisted values are free
    ByData {
        mask: u8,
        directions: BTreeMap<u8, Direction>,
    },
}

impl AttachmentRule {
    /// Resolve the attachment for a data value
    pub fn resolve(&self, data: u8) -> Option<Direction> {
        match self {
            AttachmentRule::Free => None,
            AttachmentRule::Fixed(dir) => Some(*dir),
            AttachmentRule::ByData { mask, directions } => directions.get(&(data & mask)).copied(),
        }
    }
}

/// Everything the engine needs to know about one block type
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockTraits {
    pub placement: PlacementClass,
    pub attachment: AttachmentRule,
    /// Entities can move through it; not counted as terrain surface
    pub passable: bool,
    /// Occurs in generated terrain
    pub natural_terrain: bool,
    pub liquid: bool,
    /// Holds an inventory that must be emptied before overwrite
    pub container: bool,
    /// Must be set to air before being replaced (ice would otherwise melt)
    pub clear_before_replace: bool,
    /// Bit set in `data` on the upper half of a two-cell vertical structure
    pub upper_half_flag: Option<u8>,
}

/// Block rules consumed by the scheduler and the bulk algorithms
pub trait BlockCatalog {
    /// Commit band for a block type
    fn placement_class(&self, type_id: BlockTypeId) -> PlacementClass;

    /// Neighbor direction the block depends on, if any
    fn attachment(&self, state: &BlockState) -> Option<Direction>;

    /// Lower half of a two-cell vertical structure (door bottom)
    fn is_lower_half(&self, state: &BlockState) -> bool;

    fn can_pass_through(&self, type_id: BlockTypeId) -> bool;

    fn is_natural_terrain(&self, type_id: BlockTypeId) -> bool;

    fn is_liquid(&self, type_id: BlockTypeId) -> bool;

    fn is_container(&self, type_id: BlockTypeId) -> bool;

    fn clear_before_replace(&self, type_id: BlockTypeId) -> bool;
}

/// Table-driven catalog. Types without an entry are solid, free-standing and
/// committed in the normal band; air is always passable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimpleCatalog {
    types: BTreeMap<BlockTypeId, BlockTraits>,
}

impl SimpleCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register traits for a type (builder pattern)
    pub fn with(mut self, type_id: BlockTypeId, traits: BlockTraits) -> Self {
        self.types.insert(type_id, traits);
        self
    }

    /// Register traits for a type
    pub fn insert(&mut self, type_id: BlockTypeId, traits: BlockTraits) {
        self.types.insert(type_id, traits);
    }

    /// Traits for a type, if registered
    pub fn traits(&self, type_id: BlockTypeId) -> Option<&BlockTraits> {
        self.types.get(&type_id)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let catalog: Self = serde_json::from_str(&json)?;
        log::debug!("Loaded block catalog with {} types from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Small classic catalog used by the demo binary, benches and tests.
    pub fn demo() -> Self {
        use demo_ids::*;

        let natural = BlockTraits {
            natural_terrain: true,
            ..BlockTraits::default()
        };
        let late_on_floor = BlockTraits {
            placement: PlacementClass::Late,
            attachment: AttachmentRule::Fixed(Direction::Down),
            passable: true,
            ..BlockTraits::default()
        };
        let final_on_floor = BlockTraits {
            placement: PlacementClass::Final,
            attachment: AttachmentRule::Fixed(Direction::Down),
            ..BlockTraits::default()
        };
        let door = BlockTraits {
            upper_half_flag: Some(0x8),
            ..final_on_floor.clone()
        };
        let liquid = BlockTraits {
            liquid: true,
            passable: true,
            ..BlockTraits::default()
        };
        let container = BlockTraits {
            container: true,
            ..BlockTraits::default()
        };

        // Wall torch data: 1..4 hang from the opposite wall, 5 stands on the floor.
        let torch_directions = BTreeMap::from([
            (1, Direction::West),
            (2, Direction::East),
            (3, Direction::North),
            (4, Direction::South),
            (5, Direction::Down),
        ]);
        let wall_sign_directions = BTreeMap::from([
            (2, Direction::South),
            (3, Direction::North),
            (4, Direction::East),
            (5, Direction::West),
        ]);

        Self::new()
            .with(AIR, BlockTraits { passable: true, ..BlockTraits::default() })
            .with(STONE, natural.clone())
            .with(GRASS, natural.clone())
            .with(DIRT, natural.clone())
            .with(COBBLESTONE, BlockTraits::default())
            .with(BEDROCK, natural.clone())
            .with(WATER, liquid.clone())
            .with(STATIONARY_WATER, liquid.clone())
            .with(LAVA, BlockTraits { liquid: true, ..BlockTraits::default() })
            .with(STATIONARY_LAVA, BlockTraits { liquid: true, ..BlockTraits::default() })
            .with(SAND, natural.clone())
            .with(GRAVEL, natural)
            .with(TORCH, BlockTraits {
                attachment: AttachmentRule::ByData { mask: 0x7, directions: torch_directions },
                ..late_on_floor.clone()
            })
            .with(FIRE, late_on_floor.clone())
            .with(LEVER, late_on_floor)
            .with(CHEST, container.clone())
            .with(FURNACE, container)
            .with(SIGN_POST, final_on_floor.clone())
            .with(WALL_SIGN, BlockTraits {
                placement: PlacementClass::Final,
                attachment: AttachmentRule::ByData { mask: 0x7, directions: wall_sign_directions },
                ..BlockTraits::default()
            })
            .with(WOODEN_DOOR, door.clone())
            .with(IRON_DOOR, door)
            .with(ICE, BlockTraits { clear_before_replace: true, ..BlockTraits::default() })
            .with(CACTUS, final_on_floor.clone())
            .with(REED, BlockTraits { passable: true, ..final_on_floor })
    }
}

/// Type ids used by [`SimpleCatalog::demo`]
pub mod demo_ids {
    use super::BlockTypeId;

    pub const STONE: BlockTypeId = 1;
    pub const GRASS: BlockTypeId = 2;
    pub const DIRT: BlockTypeId = 3;
    pub const COBBLESTONE: BlockTypeId = 4;
    pub const BEDROCK: BlockTypeId = 7;
    pub const WATER: BlockTypeId = 8;
    pub const STATIONARY_WATER: BlockTypeId = 9;
    pub const LAVA: BlockTypeId = 10;
    pub const STATIONARY_LAVA: BlockTypeId = 11;
    pub const SAND: BlockTypeId = 12;
    pub const GRAVEL: BlockTypeId = 13;
    pub const GLASS: BlockTypeId = 20;
    pub const WOOL: BlockTypeId = 35;
    pub const TORCH: BlockTypeId = 50;
    pub const FIRE: BlockTypeId = 51;
    pub const CHEST: BlockTypeId = 54;
    pub const FURNACE: BlockTypeId = 61;
    pub const SIGN_POST: BlockTypeId = 63;
    pub const WOODEN_DOOR: BlockTypeId = 64;
    pub const WALL_SIGN: BlockTypeId = 68;
    pub const LEVER: BlockTypeId = 69;
    pub const IRON_DOOR: BlockTypeId = 71;
    pub const ICE: BlockTypeId = 79;
    pub const CACTUS: BlockTypeId = 81;
    pub const REED: BlockTypeId = 83;
}

impl BlockCatalog for SimpleCatalog {
    fn placement_class(&self, type_id: BlockTypeId) -> PlacementClass {
        self.types.get(&type_id).map(|t| t.placement).unwrap_or_default()
    }

    fn attachment(&self, state: &BlockState) -> Option<Direction> {
        self.types.get(&state.type_id)?.attachment.resolve(state.data)
    }

    fn is_lower_half(&self, state: &BlockState) -> bool {
        match self.types.get(&state.type_id).and_then(|t| t.upper_half_flag) {
            Some(flag) => state.data & flag == 0,
            None => false,
        }
    }

    fn can_pass_through(&self, type_id: BlockTypeId) -> bool {
        type_id == AIR || self.types.get(&type_id).is_some_and(|t| t.passable)
    }

    fn is_natural_terrain(&self, type_id: BlockTypeId) -> bool {
        self.types.get(&type_id).is_some_and(|t| t.natural_terrain)
    }

    fn is_liquid(&self, type_id: BlockTypeId) -> bool {
        self.types.get(&type_id).is_some_and(|t| t.liquid)
    }

    fn is_container(&self, type_id: BlockTypeId) -> bool {
        self.types.get(&type_id).is_some_and(|t| t.container)
    }

    fn clear_before_replace(&self, type_id: BlockTypeId) -> bool {
        self.types.get(&type_id).is_some_and(|t| t.clear_before_replace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::demo_ids::*;

    #[test]
    fn test_unknown_type_defaults() {
        let catalog = SimpleCatalog::new();
        assert_eq!(catalog.placement_class(999), PlacementClass::Normal);
        assert!(!catalog.can_pass_through(999));
        assert!(catalog.can_pass_through(AIR));
        assert_eq!(catalog.attachment(&BlockState::new(999)), None);
    }

    #[test]
    fn test_demo_classes() {
        let catalog = SimpleCatalog::demo();
        assert_eq!(catalog.placement_class(STONE), PlacementClass::Normal);
        assert_eq!(catalog.placement_class(TORCH), PlacementClass::Late);
        assert_eq!(catalog.placement_class(WOODEN_DOOR), PlacementClass::Final);
        assert!(catalog.is_natural_terrain(GRASS));
        assert!(!catalog.is_natural_terrain(COBBLESTONE));
        assert!(catalog.is_liquid(STATIONARY_WATER));
        assert!(catalog.is_container(CHEST));
        assert!(catalog.clear_before_replace(ICE));
    }

    #[test]
    fn test_attachment_by_data() {
        let catalog = SimpleCatalog::demo();
        assert_eq!(catalog.attachment(&BlockState::with_data(TORCH, 5)), Some(Direction::Down));
        assert_eq!(catalog.attachment(&BlockState::with_data(TORCH, 1)), Some(Direction::West));
        assert_eq!(catalog.attachment(&BlockState::with_data(TORCH, 0)), None);
        assert_eq!(catalog.attachment(&BlockState::with_data(WALL_SIGN, 3)), Some(Direction::North));
    }

    #[test]
    fn test_door_halves() {
        let catalog = SimpleCatalog::demo();
        assert!(catalog.is_lower_half(&BlockState::with_data(WOODEN_DOOR, 0x1)));
        assert!(!catalog.is_lower_half(&BlockState::with_data(WOODEN_DOOR, 0x9)));
        assert!(!catalog.is_lower_half(&BlockState::new(STONE)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let catalog = SimpleCatalog::demo();
        catalog.save(&path).unwrap();
        let loaded = SimpleCatalog::load(&path).unwrap();

        assert_eq!(loaded, catalog);
        assert_eq!(loaded.attachment(&BlockState::with_data(TORCH, 2)), Some(Direction::East));
    }
}
