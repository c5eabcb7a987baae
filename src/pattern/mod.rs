//! Block choosers and position masks

pub mod mask;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::block::BlockState;
use crate::core::types::BlockPos;

pub use mask::{Mask, BlockTypeMask, ExistingBlockMask, InvertMask};

/// Chooses the block written at each position; called once per logical write
pub trait Pattern: std::fmt::Debug {
    fn next(&mut self, pos: BlockPos) -> BlockState;
}

/// Always the same block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleBlockPattern {
    block: BlockState,
}

impl SingleBlockPattern {
    pub fn new(block: BlockState) -> Self {
        Self { block }
    }

    /// The block this pattern writes
    pub fn block(&self) -> &BlockState {
        &self.block
    }
}

impl Pattern for SingleBlockPattern {
    fn next(&mut self, _pos: BlockPos) -> BlockState {
        self.block.clone()
    }
}

/// Weighted random choice among blocks, from its own seeded generator
#[derive(Debug, Clone)]
pub struct RandomPattern {
    entries: Vec<(BlockState, f64)>,
    total_weight: f64,
    rng: ChaCha8Rng,
}

impl RandomPattern {
    /// Create an empty pattern; add entries with [`RandomPattern::with`]
    pub fn new(seed: u64) -> Self {
        Self {
            entries: Vec::new(),
            total_weight: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Add a block with relative weight (builder pattern). Non-positive
    /// weights are ignored.
    pub fn with(mut self, block: BlockState, weight: f64) -> Self {
        if weight > 0.0 {
            self.total_weight += weight;
            self.entries.push((block, weight));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Pattern for RandomPattern {
    fn next(&mut self, _pos: BlockPos) -> BlockState {
        if self.entries.is_empty() {
            return BlockState::AIR;
        }

        let mut roll = self.rng.gen_range(0.0..self.total_weight);
        for (block, weight) in &self.entries {
            if roll < *weight {
                return block.clone();
            }
            roll -= weight;
        }
        // Float rounding can leave a sliver past the last entry
        self.entries[self.entries.len() - 1].0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_block() {
        let mut pattern = SingleBlockPattern::new(BlockState::new(4));
        assert_eq!(pattern.next(BlockPos::ZERO), BlockState::new(4));
        assert_eq!(pattern.next(BlockPos::ONE), BlockState::new(4));
    }

    #[test]
    fn test_random_is_deterministic() {
        let make = || {
            RandomPattern::new(42)
                .with(BlockState::new(1), 3.0)
                .with(BlockState::new(3), 1.0)
        };
        let mut a = make();
        let mut b = make();
        for i in 0..32 {
            let pos = BlockPos::new(i, 0, 0);
            assert_eq!(a.next(pos), b.next(pos));
        }
    }

    #[test]
    fn test_random_only_yields_entries() {
        let mut pattern = RandomPattern::new(7)
            .with(BlockState::new(1), 1.0)
            .with(BlockState::new(2), 0.0)
            .with(BlockState::new(3), 1.0);
        assert_eq!(pattern.len(), 2);
        for _ in 0..100 {
            let block = pattern.next(BlockPos::ZERO);
            assert!(block.type_id == 1 || block.type_id == 3);
        }
    }

    #[test]
    fn test_empty_random_yields_air() {
        let mut pattern = RandomPattern::new(0);
        assert!(pattern.next(BlockPos::ZERO).is_air());
    }
}
