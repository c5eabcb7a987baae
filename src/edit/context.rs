//! Write path handed to an operation body while it runs.

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::block::{BlockCatalog, BlockState, BlockTypeId};
use crate::core::types::BlockPos;
use crate::core::{EditConfig, Error, Result};
use crate::edit::invalidator::ChunkInvalidator;
use crate::edit::ledger::MutationLedger;
use crate::edit::scheduler::CommitStats;
use crate::pattern::{Mask, Pattern};
use crate::world::{BlockBag, WorldAccess};

/// Everything a session lends to the operations it runs, apart from the
/// world itself.
pub struct SessionEnv {
    pub(crate) catalog: Box<dyn BlockCatalog>,
    pub(crate) bag: Option<Box<dyn BlockBag>>,
    pub(crate) mask: Option<Box<dyn Mask>>,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) config: EditConfig,
}

impl SessionEnv {
    pub fn new(catalog: Box<dyn BlockCatalog>, config: EditConfig) -> Self {
        Self {
            catalog,
            bag: None,
            mask: None,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
        }
    }

    pub fn catalog(&self) -> &dyn BlockCatalog {
        &*self.catalog
    }

    pub fn config(&self) -> &EditConfig {
        &self.config
    }

    pub fn has_block_bag(&self) -> bool {
        self.bag.is_some()
    }
}

impl std::fmt::Debug for SessionEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEnv")
            .field("bag", &self.bag.is_some())
            .field("mask", &self.mask)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Staging area for one operation's writes.
///
/// Reads always see the world as it is, never the writes staged so far.
/// Writes are recorded in the operation's ledger and staged for commit;
/// [`EditContext::flush`] applies them.
pub struct EditContext<'a> {
    pub(super) world: &'a mut dyn WorldAccess,
    pub(super) env: &'a mut SessionEnv,
    /// Mask attached to the operation, applied on top of the session mask
    pub(super) op_mask: Option<&'a dyn Mask>,
    pub(super) ledger: &'a mut MutationLedger,
    /// Types a block bag could not supply during this operation
    pub(super) missing: BTreeSet<BlockTypeId>,
    pub(super) invalidator: ChunkInvalidator,
    pub(super) stats: CommitStats,
}

impl<'a> EditContext<'a> {
    pub fn new(
        world: &'a mut dyn WorldAccess,
        env: &'a mut SessionEnv,
        op_mask: Option<&'a dyn Mask>,
        ledger: &'a mut MutationLedger,
    ) -> Self {
        Self {
            world,
            env,
            op_mask,
            ledger,
            missing: BTreeSet::new(),
            invalidator: ChunkInvalidator::new(),
            stats: CommitStats::default(),
        }
    }

    pub fn world(&self) -> &dyn WorldAccess {
        &*self.world
    }

    pub fn catalog(&self) -> &dyn BlockCatalog {
        &*self.env.catalog
    }

    pub fn config(&self) -> &EditConfig {
        &self.env.config
    }

    /// Block currently in the world (staged writes are not visible)
    pub fn block(&self, pos: BlockPos) -> BlockState {
        self.world.block(pos)
    }

    pub fn max_y(&self) -> i32 {
        self.world.max_y()
    }

    /// Distinct positions touched so far
    pub fn change_count(&self) -> usize {
        self.ledger.change_count()
    }

    pub fn missing(&self) -> &BTreeSet<BlockTypeId> {
        &self.missing
    }

    pub fn stats(&self) -> &CommitStats {
        &self.stats
    }

    /// Record and stage a write.
    ///
    /// Returns whether the requested block differs in type or data from what
    /// is in the world now. Fails once the operation would touch more
    /// distinct positions than the configured budget allows.
    pub fn set_block(&mut self, pos: BlockPos, state: BlockState) -> Result<bool> {
        if !self.ledger.original().contains(pos) {
            if let Some(limit) = self.env.config.max_changed_blocks {
                if self.ledger.change_count() >= limit {
                    return Err(Error::ChangeLimitExceeded { limit });
                }
            }
            let existing = self.world.block(pos);
            self.ledger.record_original(pos, existing);
        }
        self.ledger.record_current(pos, state.clone());
        Ok(self.stage(pos, state))
    }

    /// Write only where the world currently holds air
    pub fn set_if_air(&mut self, pos: BlockPos, state: BlockState) -> Result<bool> {
        if !self.world.block(pos).is_air() {
            return Ok(false);
        }
        self.set_block(pos, state)
    }

    /// Write with the given probability, drawn from the session random source
    pub fn set_with_chance(&mut self, pos: BlockPos, state: BlockState, probability: f64) -> Result<bool> {
        if self.env.rng.r#gen::<f64>() <= probability {
            self.set_block(pos, state)
        } else {
            Ok(false)
        }
    }

    /// Write whatever the pattern yields for this position
    pub fn set_pattern(&mut self, pos: BlockPos, pattern: &mut dyn Pattern) -> Result<bool> {
        let state = pattern.next(pos);
        self.set_block(pos, state)
    }

    /// Stage a write without touching the ledger or the budget.
    /// Used when replaying history.
    pub(crate) fn replay_block(&mut self, pos: BlockPos, state: BlockState) -> bool {
        self.stage(pos, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::SimpleCatalog;
    use crate::block::demo_ids::*;
    use crate::pattern::SingleBlockPattern;
    use crate::world::MemoryWorld;

    fn env(config: EditConfig) -> SessionEnv {
        SessionEnv::new(Box::new(SimpleCatalog::demo()), config)
    }

    #[test]
    fn test_set_block_records_original_once() {
        let mut world = MemoryWorld::default();
        let pos = BlockPos::new(0, 10, 0);
        world.place(pos, BlockState::new(DIRT));
        let mut env = env(EditConfig::default());
        let mut ledger = MutationLedger::new();

        let mut edit = EditContext::new(&mut world, &mut env, None, &mut ledger);
        assert!(edit.set_block(pos, BlockState::new(STONE)).unwrap());
        assert!(edit.set_block(pos, BlockState::new(GLASS)).unwrap());
        // Staged writes are not visible to reads
        assert_eq!(edit.block(pos), BlockState::new(DIRT));
        assert_eq!(edit.change_count(), 1);
        drop(edit);

        assert_eq!(ledger.original().get(pos), Some(&BlockState::new(DIRT)));
        assert_eq!(ledger.current().get(pos), Some(&BlockState::new(GLASS)));
    }

    #[test]
    fn test_budget_exact_and_overflow() {
        let mut world = MemoryWorld::default();
        let mut env = env(EditConfig::with_change_limit(3));
        let mut ledger = MutationLedger::new();
        let mut edit = EditContext::new(&mut world, &mut env, None, &mut ledger);

        for x in 0..3 {
            edit.set_block(BlockPos::new(x, 1, 0), BlockState::new(STONE)).unwrap();
        }
        // Rewriting a known position does not use budget
        assert!(edit.set_block(BlockPos::new(0, 1, 0), BlockState::new(SAND)).is_ok());

        let err = edit.set_block(BlockPos::new(3, 1, 0), BlockState::new(STONE)).unwrap_err();
        assert!(matches!(err, Error::ChangeLimitExceeded { limit: 3 }));
        assert_eq!(edit.change_count(), 3);
    }

    #[test]
    fn test_set_if_air() {
        let mut world = MemoryWorld::default();
        world.place(BlockPos::new(0, 1, 0), BlockState::new(STONE));
        let mut env = env(EditConfig::default());
        let mut ledger = MutationLedger::new();
        let mut edit = EditContext::new(&mut world, &mut env, None, &mut ledger);

        assert!(!edit.set_if_air(BlockPos::new(0, 1, 0), BlockState::new(SAND)).unwrap());
        assert!(edit.set_if_air(BlockPos::new(0, 2, 0), BlockState::new(SAND)).unwrap());
        assert_eq!(edit.change_count(), 1);
    }

    #[test]
    fn test_set_with_chance_bounds() {
        let mut world = MemoryWorld::default();
        let mut env = env(EditConfig::default());
        let mut ledger = MutationLedger::new();
        let mut edit = EditContext::new(&mut world, &mut env, None, &mut ledger);

        for x in 0..16 {
            assert!(!edit.set_with_chance(BlockPos::new(x, 1, 0), BlockState::new(WOOL), -1.0).unwrap());
            assert!(edit.set_with_chance(BlockPos::new(x, 2, 0), BlockState::new(WOOL), 1.0).unwrap());
        }
        assert_eq!(edit.change_count(), 16);
    }

    #[test]
    fn test_set_pattern() {
        let mut world = MemoryWorld::default();
        let mut env = env(EditConfig::default());
        let mut ledger = MutationLedger::new();
        let mut edit = EditContext::new(&mut world, &mut env, None, &mut ledger);

        let mut pattern = SingleBlockPattern::new(BlockState::with_data(WOOL, 14));
        edit.set_pattern(BlockPos::new(4, 4, 4), &mut pattern).unwrap();
        drop(edit);
        assert_eq!(ledger.current().get(BlockPos::new(4, 4, 4)), Some(&BlockState::with_data(WOOL, 14)));
    }
}
