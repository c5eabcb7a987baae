//! Block values and the placement rules a world catalog supplies

pub mod state;
pub mod catalog;

pub use state::{BlockTypeId, BlockState, BlockPayload, ItemStack, AIR};
pub use catalog::{demo_ids, BlockCatalog, BlockTraits, AttachmentRule, PlacementClass, SimpleCatalog};
