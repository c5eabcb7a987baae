//! Block state value type

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Numeric block type identifier
pub type BlockTypeId = u16;

/// Type id of the empty block
pub const AIR: BlockTypeId = 0;

/// One stack of items inside a container block
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: u16,
    pub count: u8,
    pub damage: u16,
}

/// Extra data attached to "rich" block kinds
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockPayload {
    /// Stored contents of a container
    Inventory(Vec<ItemStack>),
    /// Free-form keyed properties (sign text, spawner entity, note pitch...)
    Properties(BTreeMap<String, String>),
}

/// Contents of one block position - immutable once built
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    /// Block type
    pub type_id: BlockTypeId,
    /// Sub-variant / orientation data
    pub data: u8,
    /// Attached payload for rich blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Box<BlockPayload>>,
}

impl BlockState {
    /// Empty/air block
    pub const AIR: BlockState = BlockState {
        type_id: AIR,
        data: 0,
        payload: None,
    };

    /// Create block of a type with zero data
    pub fn new(type_id: BlockTypeId) -> Self {
        Self {
            type_id,
            data: 0,
            payload: None,
        }
    }

    /// Create block with type and variant data
    pub fn with_data(type_id: BlockTypeId, data: u8) -> Self {
        Self {
            type_id,
            data,
            payload: None,
        }
    }

    /// Create a copy carrying the given payload
    pub fn with_payload(self, payload: BlockPayload) -> Self {
        Self {
            payload: Some(Box::new(payload)),
            ..self
        }
    }

    /// Create a copy without payload
    pub fn without_payload(&self) -> Self {
        Self::with_data(self.type_id, self.data)
    }

    /// Check if block is empty (air)
    pub fn is_air(&self) -> bool {
        self.type_id == AIR
    }

    /// Same type and data, payload ignored
    pub fn same_kind(&self, other: &BlockState) -> bool {
        self.type_id == other.type_id && self.data == other.data
    }
}
