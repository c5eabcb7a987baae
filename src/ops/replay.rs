//! Undo/redo replay of recorded mutations.

use crate::core::Result;
use crate::edit::{EditContext, MutationRecord, OperationBody, SpatialTarget, TargetKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayDirection {
    /// Restore pre-edit values
    Undo,
    /// Reapply the final requested values
    Redo,
}

/// Writes recorded states back through the scheduler without recording them
/// again. Replayed writes are corrections, not new edits, so they neither
/// consume the change budget nor land in a ledger.
#[derive(Debug)]
pub struct Replay {
    direction: ReplayDirection,
    /// Records in replay order
    records: Vec<MutationRecord>,
}

impl Replay {
    /// Restore `original` records. `records` must be newest operation first;
    /// each record is replayed in reverse insertion order.
    pub fn undo(records: Vec<MutationRecord>) -> Self {
        Self {
            direction: ReplayDirection::Undo,
            records,
        }
    }

    /// Reapply `current` records. `records` must be oldest operation first;
    /// each record is replayed in insertion order.
    pub fn redo(records: Vec<MutationRecord>) -> Self {
        Self {
            direction: ReplayDirection::Redo,
            records,
        }
    }

    pub fn direction(&self) -> ReplayDirection {
        self.direction
    }

    /// Writes this replay will stage
    pub fn len(&self) -> usize {
        self.records.iter().map(MutationRecord::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OperationBody for Replay {
    fn name(&self) -> &'static str {
        match self.direction {
            ReplayDirection::Undo => "undo",
            ReplayDirection::Redo => "redo",
        }
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::Unbound
    }

    fn execute(&mut self, _target: &SpatialTarget, edit: &mut EditContext<'_>) -> Result<()> {
        for record in &self.records {
            match self.direction {
                ReplayDirection::Undo => {
                    for (pos, state) in record.iter().rev() {
                        edit.replay_block(pos, state.clone());
                    }
                }
                ReplayDirection::Redo => {
                    for (pos, state) in record.iter() {
                        edit.replay_block(pos, state.clone());
                    }
                }
            }
        }
        Ok(())
    }
}
