//! Inventory-backed block supply

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use thiserror::Error;

use crate::block::BlockTypeId;

/// Why a bag refused a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlockBagError {
    /// The type can never come out of this bag
    #[error("Block type {0} cannot be obtained")]
    NotObtainable(BlockTypeId),

    /// The type is obtainable but the bag ran out
    #[error("Out of block type {0}")]
    InsufficientSupply(BlockTypeId),
}

/// Supply constraint on placement and removal
pub trait BlockBag {
    /// Take one unit out of the bag for placement
    fn withdraw(&mut self, type_id: BlockTypeId, data: u8) -> Result<(), BlockBagError>;

    /// Return a removed block to the bag; callers ignore failures
    fn deposit(&mut self, type_id: BlockTypeId, data: u8) -> Result<(), BlockBagError>;
}

/// Counted stock per block type
#[derive(Debug, Clone, Default)]
pub struct InventoryBag {
    stock: HashMap<BlockTypeId, u32>,
    unobtainable: HashSet<BlockTypeId>,
    /// Per-type cap on stored units; deposits beyond it fail
    capacity: Option<u32>,
}

impl InventoryBag {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Add stock (builder pattern)
    pub fn with_stock(mut self, type_id: BlockTypeId, count: u32) -> Self {
        *self.stock.entry(type_id).or_insert(0) += count;
        self
    }

    /// Mark a type as never obtainable (builder pattern)
    pub fn with_unobtainable(mut self, type_id: BlockTypeId) -> Self {
        self.unobtainable.insert(type_id);
        self
    }

    /// Limit units stored per type (builder pattern)
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Units of a type currently held
    pub fn count(&self, type_id: BlockTypeId) -> u32 {
        self.stock.get(&type_id).copied().unwrap_or(0)
    }
}

impl BlockBag for InventoryBag {
    fn withdraw(&mut self, type_id: BlockTypeId, _data: u8) -> Result<(), BlockBagError> {
        if self.unobtainable.contains(&type_id) {
            return Err(BlockBagError::NotObtainable(type_id));
        }
        match self.stock.get_mut(&type_id) {
            Some(count) if *count > 0 => {
                *count -= 1;
                Ok(())
            }
            _ => Err(BlockBagError::InsufficientSupply(type_id)),
        }
    }

    fn deposit(&mut self, type_id: BlockTypeId, _data: u8) -> Result<(), BlockBagError> {
        if self.unobtainable.contains(&type_id) {
            return Err(BlockBagError::NotObtainable(type_id));
        }
        let count = self.stock.entry(type_id).or_insert(0);
        if self.capacity.is_some_and(|cap| *count >= cap) {
            return Err(BlockBagError::InsufficientSupply(type_id));
        }
        *count += 1;
        Ok(())
    }
}

/// Lets a host keep a handle on a bag it lent to a session
impl<B: BlockBag> BlockBag for Rc<RefCell<B>> {
    fn withdraw(&mut self, type_id: BlockTypeId, data: u8) -> Result<(), BlockBagError> {
        self.borrow_mut().withdraw(type_id, data)
    }

    fn deposit(&mut self, type_id: BlockTypeId, data: u8) -> Result<(), BlockBagError> {
        self.borrow_mut().deposit(type_id, data)
    }
}
