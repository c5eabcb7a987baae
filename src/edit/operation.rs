//! Operation lifecycle.
//!
//! An [`Operation`] couples a body (the algorithm) with the target it runs on
//! and the ledger of everything it changed. It runs exactly once:
//! `Created -> Initialized -> Executing -> Committed -> Registered`, or
//! `Failed` on error.

use std::fmt;

use serde::Serialize;

use crate::block::BlockTypeId;
use crate::core::types::BlockPos;
use crate::core::{Error, Result};
use crate::edit::context::{EditContext, SessionEnv};
use crate::edit::ledger::MutationLedger;
use crate::edit::record::MutationRecord;
use crate::edit::scheduler::CommitStats;
use crate::math::CuboidRegion;
use crate::pattern::Mask;
use crate::world::{SelectionResolver, WorldAccess};

/// What kind of target a body needs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    Region,
    Point,
    /// Needs no selection (history replay)
    Unbound,
}

/// Resolved target of an operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialTarget {
    Region(CuboidRegion),
    Point(BlockPos),
    Unbound,
}

impl SpatialTarget {
    pub fn kind(&self) -> TargetKind {
        match self {
            SpatialTarget::Region(_) => TargetKind::Region,
            SpatialTarget::Point(_) => TargetKind::Point,
            SpatialTarget::Unbound => TargetKind::Unbound,
        }
    }

    pub fn region(&self) -> Option<&CuboidRegion> {
        match self {
            SpatialTarget::Region(region) => Some(region),
            _ => None,
        }
    }

    pub fn point(&self) -> Option<BlockPos> {
        match self {
            SpatialTarget::Point(point) => Some(*point),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationState {
    Created,
    Initialized,
    Executing,
    Committed,
    Registered,
    Failed,
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationState::Created => "created",
            OperationState::Initialized => "initialized",
            OperationState::Executing => "executing",
            OperationState::Committed => "committed",
            OperationState::Registered => "registered",
            OperationState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The algorithm of an operation.
///
/// Bodies read through the context and write only through its `set_*`
/// methods; the context records, budgets and schedules every write.
pub trait OperationBody: fmt::Debug {
    fn name(&self) -> &'static str;

    fn target_kind(&self) -> TargetKind;

    fn execute(&mut self, target: &SpatialTarget, edit: &mut EditContext<'_>) -> Result<()>;
}

/// Outcome of one run
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OperationReport {
    pub name: &'static str,
    /// Distinct positions touched
    pub changed_blocks: usize,
    /// Types the block bag ran out of
    pub missing: Vec<BlockTypeId>,
    pub stats: CommitStats,
}

/// One bulk edit: body, target, mask and the record of its changes
pub struct Operation {
    body: Box<dyn OperationBody>,
    target: Option<SpatialTarget>,
    mask: Option<Box<dyn Mask>>,
    ledger: MutationLedger,
    state: OperationState,
    report: Option<OperationReport>,
    id: Option<u64>,
}

impl Operation {
    pub fn new(body: impl OperationBody + 'static) -> Self {
        Self::from_boxed(Box::new(body))
    }

    pub fn from_boxed(body: Box<dyn OperationBody>) -> Self {
        Self {
            body,
            target: None,
            mask: None,
            ledger: MutationLedger::new(),
            state: OperationState::Created,
            report: None,
            id: None,
        }
    }

    /// Fix the target instead of asking the selection resolver (builder pattern)
    pub fn with_target(mut self, target: SpatialTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Only write where the mask matches (builder pattern)
    pub fn with_mask(mut self, mask: impl Mask + 'static) -> Self {
        self.mask = Some(Box::new(mask));
        self
    }

    pub fn with_boxed_mask(mut self, mask: Option<Box<dyn Mask>>) -> Self {
        self.mask = mask;
        self
    }

    pub fn name(&self) -> &'static str {
        self.body.name()
    }

    pub fn state(&self) -> OperationState {
        self.state
    }

    pub fn target(&self) -> Option<&SpatialTarget> {
        self.target.as_ref()
    }

    /// History id, assigned on registration
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    /// Number of distinct positions changed
    pub fn change_count(&self) -> usize {
        self.ledger.change_count()
    }

    /// Pre-edit values of every touched position
    pub fn original(&self) -> &MutationRecord {
        self.ledger.original()
    }

    /// Final requested values of every touched position
    pub fn current(&self) -> &MutationRecord {
        self.ledger.current()
    }

    /// Final values the world actually received, skipping masked positions
    pub fn committed(&self) -> MutationRecord {
        self.ledger.committed()
    }

    pub fn report(&self) -> Option<&OperationReport> {
        self.report.as_ref()
    }

    /// Resolve the target if none was fixed.
    pub fn initialize(&mut self, selection: &dyn SelectionResolver) -> Result<()> {
        if self.state != OperationState::Created {
            return Err(self.invalid_state());
        }

        if self.target.is_none() {
            let target = match self.body.target_kind() {
                TargetKind::Region => selection.resolve_region().map(SpatialTarget::Region),
                TargetKind::Point => selection.resolve_placement_point().map(SpatialTarget::Point),
                TargetKind::Unbound => Ok(SpatialTarget::Unbound),
            };
            match target {
                Ok(target) => self.target = Some(target),
                Err(err) => {
                    self.state = OperationState::Failed;
                    return Err(err);
                }
            }
        }

        self.state = OperationState::Initialized;
        Ok(())
    }

    /// Initialize, execute the body and commit its writes.
    ///
    /// Writes accepted before a failure are still committed so the ledger
    /// and the world agree; the operation then ends up `Failed`.
    pub fn run(
        &mut self,
        world: &mut dyn WorldAccess,
        env: &mut SessionEnv,
        selection: &dyn SelectionResolver,
    ) -> Result<OperationReport> {
        if self.state == OperationState::Created {
            self.initialize(selection)?;
        }
        if self.state != OperationState::Initialized {
            return Err(self.invalid_state());
        }
        let target = self.target.unwrap_or(SpatialTarget::Unbound);

        self.state = OperationState::Executing;
        let name = self.body.name();
        log::debug!("Running {} on {:?}", name, target);

        let mut edit = EditContext::new(world, env, self.mask.as_deref(), &mut self.ledger);
        let result = self.body.execute(&target, &mut edit);
        edit.flush();

        let report = OperationReport {
            name,
            changed_blocks: edit.change_count(),
            missing: edit.missing().iter().copied().collect(),
            stats: edit.stats().clone(),
        };
        drop(edit);

        if !report.missing.is_empty() {
            log::warn!("{}: block bag is missing types {:?}", name, report.missing);
        }
        self.report = Some(report.clone());

        match result {
            Ok(()) => {
                self.state = OperationState::Committed;
                log::info!(
                    "{} committed {} blocks ({} writes applied)",
                    name,
                    report.changed_blocks,
                    report.stats.applied
                );
                Ok(report)
            }
            Err(err) => {
                self.state = OperationState::Failed;
                log::warn!("{} failed after {} blocks: {}", name, report.changed_blocks, err);
                Err(err)
            }
        }
    }

    pub(crate) fn mark_registered(&mut self, id: u64) {
        self.id = Some(id);
        if self.state == OperationState::Committed {
            self.state = OperationState::Registered;
        }
    }

    fn invalid_state(&self) -> Error {
        Error::InvalidState {
            operation: self.body.name(),
            state: self.state.to_string(),
        }
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("body", &self.body)
            .field("target", &self.target)
            .field("state", &self.state)
            .field("changed", &self.ledger.change_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::demo_ids::*;
    use crate::block::{BlockState, SimpleCatalog};
    use crate::core::EditConfig;
    use crate::world::{FixedSelection, MemoryWorld};

    /// Writes a fixed block at every region position, optionally failing
    /// after a number of writes.
    #[derive(Debug)]
    struct Paint {
        block: BlockState,
        fail_after: Option<usize>,
    }

    impl OperationBody for Paint {
        fn name(&self) -> &'static str {
            "paint"
        }

        fn target_kind(&self) -> TargetKind {
            TargetKind::Region
        }

        fn execute(&mut self, target: &SpatialTarget, edit: &mut EditContext<'_>) -> Result<()> {
            let Some(region) = target.region() else {
                return Err(Error::IncompleteSelection("paint needs a region".into()));
            };
            for (written, pos) in region.iter().enumerate() {
                if self.fail_after == Some(written) {
                    return Err(Error::Config("stop".into()));
                }
                edit.set_block(pos, self.block.clone())?;
            }
            Ok(())
        }
    }

    fn env() -> SessionEnv {
        SessionEnv::new(Box::new(SimpleCatalog::demo()), EditConfig::default())
    }

    fn region() -> CuboidRegion {
        CuboidRegion::new(BlockPos::new(0, 1, 0), BlockPos::new(1, 1, 1))
    }

    #[test]
    fn test_lifecycle_success() {
        let mut world = MemoryWorld::default();
        let mut env = env();
        let mut op = Operation::new(Paint {
            block: BlockState::new(STONE),
            fail_after: None,
        });
        assert_eq!(op.state(), OperationState::Created);

        let report = op.run(&mut world, &mut env, &FixedSelection::region(region())).unwrap();
        assert_eq!(op.state(), OperationState::Committed);
        assert_eq!(report.changed_blocks, 4);
        assert_eq!(report.stats.applied, 4);
        assert_eq!(op.target(), Some(&SpatialTarget::Region(region())));
        assert_eq!(world.block_count(), 4);

        op.mark_registered(7);
        assert_eq!(op.state(), OperationState::Registered);
        assert_eq!(op.id(), Some(7));
    }

    #[test]
    fn test_runs_only_once() {
        let mut world = MemoryWorld::default();
        let mut env = env();
        let mut op = Operation::new(Paint {
            block: BlockState::new(STONE),
            fail_after: None,
        });
        let selection = FixedSelection::region(region());
        op.run(&mut world, &mut env, &selection).unwrap();

        let err = op.run(&mut world, &mut env, &selection).unwrap_err();
        assert!(matches!(err, Error::InvalidState { operation: "paint", .. }));
    }

    #[test]
    fn test_incomplete_selection() {
        let mut world = MemoryWorld::default();
        let mut env = env();
        let mut op = Operation::new(Paint {
            block: BlockState::new(STONE),
            fail_after: None,
        });

        let err = op.run(&mut world, &mut env, &FixedSelection::none()).unwrap_err();
        assert!(matches!(err, Error::IncompleteSelection(_)));
        assert_eq!(op.state(), OperationState::Failed);
        assert_eq!(op.change_count(), 0);
        assert!(world.write_log().is_empty());
    }

    #[test]
    fn test_fixed_target_skips_resolver() {
        let mut world = MemoryWorld::default();
        let mut env = env();
        let mut op = Operation::new(Paint {
            block: BlockState::new(SAND),
            fail_after: None,
        })
        .with_target(SpatialTarget::Region(CuboidRegion::new(BlockPos::new(5, 5, 5), BlockPos::new(5, 5, 5))));

        op.run(&mut world, &mut env, &FixedSelection::none()).unwrap();
        assert_eq!(world.block(BlockPos::new(5, 5, 5)), BlockState::new(SAND));
    }

    #[test]
    fn test_failure_still_commits_accepted_writes() {
        let mut world = MemoryWorld::default();
        let mut env = env();
        let mut op = Operation::new(Paint {
            block: BlockState::new(STONE),
            fail_after: Some(2),
        });

        assert!(op.run(&mut world, &mut env, &FixedSelection::region(region())).is_err());
        assert_eq!(op.state(), OperationState::Failed);
        assert_eq!(op.change_count(), 2);
        assert_eq!(world.block_count(), 2);
        assert_eq!(op.report().map(|r| r.changed_blocks), Some(2));
    }

    #[test]
    fn test_operation_mask() {
        let mut world = MemoryWorld::default();
        world.place(BlockPos::new(0, 1, 0), BlockState::new(DIRT));
        let mut env = env();
        let mut op = Operation::new(Paint {
            block: BlockState::new(STONE),
            fail_after: None,
        })
        .with_mask(crate::pattern::ExistingBlockMask);

        let report = op.run(&mut world, &mut env, &FixedSelection::region(region())).unwrap();
        assert_eq!(report.stats.applied, 1);
        assert_eq!(report.stats.skipped_mask, 3);
        // Masked writes are still part of the ledger
        assert_eq!(op.change_count(), 4);
    }
}
