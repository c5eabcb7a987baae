//! Per-operation mutation bookkeeping.
//!
//! A ledger holds five records: the pre-edit value of every position the
//! operation touched (`original`), the last value it requested there
//! (`current`), and three pending bands of writes staged for commit. A
//! position sits in at most one pending band.

use std::collections::HashMap;

use serde::Serialize;

use crate::block::{BlockState, PlacementClass};
use crate::core::types::BlockPos;
use crate::edit::record::MutationRecord;

/// Pending write band, committed in declaration order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PendingBand {
    /// Independent blocks
    Deferred,
    /// Delicate fixtures that need their neighbors in place
    Late,
    /// Attached blocks committed by dependency chain
    Final,
}

impl PendingBand {
    pub const ALL: [PendingBand; 3] = [PendingBand::Deferred, PendingBand::Late, PendingBand::Final];

    /// Band a placement class is staged in
    pub fn for_class(class: PlacementClass) -> Self {
        match class {
            PlacementClass::Normal => PendingBand::Deferred,
            PlacementClass::Late => PendingBand::Late,
            PlacementClass::Final => PendingBand::Final,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PendingBand::Deferred => "deferred",
            PendingBand::Late => "late",
            PendingBand::Final => "final",
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct MutationLedger {
    original: MutationRecord,
    current: MutationRecord,
    #[serde(skip)]
    deferred: MutationRecord,
    #[serde(skip)]
    late: MutationRecord,
    #[serde(skip)]
    final_band: MutationRecord,
    /// Mask verdict per position, true once any write got through
    #[serde(skip)]
    mask_verdicts: HashMap<BlockPos, bool>,
}

impl MutationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-edit values, first write per position wins
    pub fn original(&self) -> &MutationRecord {
        &self.original
    }

    /// Latest requested values
    pub fn current(&self) -> &MutationRecord {
        &self.current
    }

    /// Number of distinct positions touched
    pub fn change_count(&self) -> usize {
        self.original.len()
    }

    /// Remember the pre-edit value unless one is already stored.
    /// Returns whether this is the first touch of the position.
    pub fn record_original(&mut self, pos: BlockPos, state: BlockState) -> bool {
        self.original.insert_if_absent(pos, state)
    }

    pub fn record_current(&mut self, pos: BlockPos, state: BlockState) {
        self.current.insert(pos, state);
    }

    /// Note whether a mask let a write through at `pos`
    pub fn record_mask_verdict(&mut self, pos: BlockPos, allowed: bool) {
        let verdict = self.mask_verdicts.entry(pos).or_insert(false);
        *verdict |= allowed;
    }

    /// Latest requested values, minus positions where a mask refused every
    /// write. This is what the world received, so redo replays it.
    pub fn committed(&self) -> MutationRecord {
        if self.mask_verdicts.is_empty() {
            return self.current.clone();
        }
        self.current
            .iter()
            .filter(|(pos, _)| self.mask_verdicts.get(pos).copied().unwrap_or(true))
            .map(|(pos, state)| (pos, state.clone()))
            .collect()
    }

    /// Stage a write, moving the position out of whichever band held it
    pub fn enqueue(&mut self, band: PendingBand, pos: BlockPos, state: BlockState) {
        for other in PendingBand::ALL {
            if other != band {
                self.band_mut(other).remove(pos);
            }
        }
        self.band_mut(band).insert(pos, state);
    }

    pub fn band(&self, band: PendingBand) -> &MutationRecord {
        match band {
            PendingBand::Deferred => &self.deferred,
            PendingBand::Late => &self.late,
            PendingBand::Final => &self.final_band,
        }
    }

    /// Drain one band in insertion order
    pub fn take_band(&mut self, band: PendingBand) -> Vec<(BlockPos, BlockState)> {
        self.band_mut(band).take()
    }

    /// Total staged writes across all bands
    pub fn pending_len(&self) -> usize {
        self.deferred.len() + self.late.len() + self.final_band.len()
    }

    pub fn has_pending(&self) -> bool {
        self.pending_len() > 0
    }

    fn band_mut(&mut self, band: PendingBand) -> &mut MutationRecord {
        match band {
            PendingBand::Deferred => &mut self.deferred,
            PendingBand::Late => &mut self.late,
            PendingBand::Final => &mut self.final_band,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_first_write_wins() {
        let mut ledger = MutationLedger::new();
        let pos = BlockPos::new(1, 2, 3);

        assert!(ledger.record_original(pos, BlockState::new(1)));
        assert!(!ledger.record_original(pos, BlockState::new(2)));
        ledger.record_current(pos, BlockState::new(5));
        ledger.record_current(pos, BlockState::new(6));

        assert_eq!(ledger.original().get(pos), Some(&BlockState::new(1)));
        assert_eq!(ledger.current().get(pos), Some(&BlockState::new(6)));
        assert_eq!(ledger.change_count(), 1);
    }

    #[test]
    fn test_enqueue_moves_between_bands() {
        let mut ledger = MutationLedger::new();
        let pos = BlockPos::new(0, 5, 0);

        ledger.enqueue(PendingBand::Late, pos, BlockState::new(50));
        assert!(ledger.band(PendingBand::Late).contains(pos));

        ledger.enqueue(PendingBand::Deferred, pos, BlockState::new(1));
        assert!(ledger.band(PendingBand::Deferred).contains(pos));
        assert!(ledger.band(PendingBand::Late).is_empty());
        assert_eq!(ledger.pending_len(), 1);
    }

    #[test]
    fn test_committed_drops_masked_positions() {
        let mut ledger = MutationLedger::new();
        let passed = BlockPos::new(0, 1, 0);
        let refused = BlockPos::new(1, 1, 0);
        let unmasked = BlockPos::new(2, 1, 0);
        for pos in [passed, refused, unmasked] {
            ledger.record_current(pos, BlockState::AIR);
        }
        assert_eq!(ledger.committed().len(), 3);

        // A later refusal does not undo an earlier pass
        ledger.record_mask_verdict(passed, true);
        ledger.record_mask_verdict(passed, false);
        ledger.record_mask_verdict(refused, false);

        let committed = ledger.committed();
        let positions: Vec<_> = committed.positions().collect();
        assert_eq!(positions, vec![passed, unmasked]);
        assert_eq!(ledger.current().len(), 3);
    }

    #[test]
    fn test_take_band_in_order() {
        let mut ledger = MutationLedger::new();
        for x in 0..4 {
            ledger.enqueue(PendingBand::Deferred, BlockPos::new(x, 0, 0), BlockState::new(1));
        }
        ledger.enqueue(PendingBand::Final, BlockPos::new(9, 0, 0), BlockState::new(63));

        let deferred = ledger.take_band(PendingBand::Deferred);
        let xs: Vec<_> = deferred.iter().map(|(pos, _)| pos.x).collect();
        assert_eq!(xs, vec![0, 1, 2, 3]);
        assert!(ledger.has_pending());
        assert_eq!(ledger.take_band(PendingBand::Final).len(), 1);
        assert!(!ledger.has_pending());
    }

    #[test]
    fn test_band_for_class() {
        assert_eq!(PendingBand::for_class(PlacementClass::Normal), PendingBand::Deferred);
        assert_eq!(PendingBand::for_class(PlacementClass::Late), PendingBand::Late);
        assert_eq!(PendingBand::for_class(PlacementClass::Final), PendingBand::Final);
    }
}
