//! Capabilities the engine consumes from its host, plus in-memory versions

pub mod access;
pub mod chunk;
pub mod memory;
pub mod bag;
pub mod selection;

pub use access::WorldAccess;
pub use chunk::ColumnCoord;
pub use memory::MemoryWorld;
pub use bag::{BlockBag, BlockBagError, InventoryBag};
pub use selection::{SelectionResolver, FixedSelection};
