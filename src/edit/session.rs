//! Edit session: one world, its history and the environment lent to every
//! operation run against it.

use crate::block::BlockCatalog;
use crate::core::{EditConfig, Result};
use crate::edit::context::SessionEnv;
use crate::edit::history::EditHistory;
use crate::edit::operation::{Operation, OperationReport};
use crate::ops::Replay;
use crate::pattern::Mask;
use crate::world::{BlockBag, FixedSelection, SelectionResolver, WorldAccess};

pub struct EditSession<W: WorldAccess> {
    world: W,
    env: SessionEnv,
    history: EditHistory,
}

impl<W: WorldAccess> EditSession<W> {
    /// Create a session over a world. Fails if the config is out of range.
    pub fn new(world: W, catalog: impl BlockCatalog + 'static, config: EditConfig) -> Result<Self> {
        config.validate()?;
        let history = EditHistory::new(config.history_capacity);
        Ok(Self {
            world,
            env: SessionEnv::new(Box::new(catalog), config),
            history,
        })
    }

    /// Constrain placement by a block supply (builder pattern)
    pub fn with_block_bag(mut self, bag: impl BlockBag + 'static) -> Self {
        self.env.bag = Some(Box::new(bag));
        self
    }

    /// Replace or remove the block supply, returning the previous one
    pub fn set_block_bag(&mut self, bag: Option<Box<dyn BlockBag>>) -> Option<Box<dyn BlockBag>> {
        std::mem::replace(&mut self.env.bag, bag)
    }

    /// Restrict every write of this session to positions the mask accepts
    pub fn set_mask(&mut self, mask: Option<Box<dyn Mask>>) {
        self.env.mask = mask;
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn into_world(self) -> W {
        self.world
    }

    pub fn config(&self) -> &EditConfig {
        &self.env.config
    }

    pub fn catalog(&self) -> &dyn BlockCatalog {
        self.env.catalog()
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Run an operation and register it for undo.
    ///
    /// An operation that fails after touching blocks is registered anyway,
    /// so what it managed to commit can still be undone.
    pub fn run(&mut self, mut op: Operation, selection: &dyn SelectionResolver) -> Result<OperationReport> {
        match op.run(&mut self.world, &mut self.env, selection) {
            Ok(report) => {
                self.history.push(op);
                Ok(report)
            }
            Err(err) => {
                if op.change_count() > 0 {
                    log::debug!("Registering partial {} ({} blocks) for undo", op.name(), op.change_count());
                    self.history.push(op);
                }
                Err(err)
            }
        }
    }

    /// Undo the `count` most recent operations, newest first.
    /// Returns how many were undone.
    pub fn undo(&mut self, count: usize) -> Result<usize> {
        let ops = self.history.take_undo(count);
        if ops.is_empty() {
            return Ok(0);
        }

        let records = ops.iter().map(|op| op.original().clone()).collect();
        let result = self.replay(Replay::undo(records));
        let undone = ops.len();
        self.history.push_undone(ops);
        result?;

        log::info!("Undid {} operations", undone);
        Ok(undone)
    }

    /// Redo the `count` most recently undone operations, oldest first.
    /// Returns how many were redone.
    pub fn redo(&mut self, count: usize) -> Result<usize> {
        let ops = self.history.take_redo(count);
        if ops.is_empty() {
            return Ok(0);
        }

        let records = ops.iter().map(|op| op.committed()).collect();
        let result = self.replay(Replay::redo(records));
        let redone = ops.len();
        self.history.push_redone(ops);
        result?;

        log::info!("Redid {} operations", redone);
        Ok(redone)
    }

    /// Replays write recorded states exactly. The session mask is lifted
    /// while they run; redo records already leave out masked positions.
    fn replay(&mut self, body: Replay) -> Result<OperationReport> {
        let mask = self.env.mask.take();
        let mut replay = Operation::new(body);
        let result = replay.run(&mut self.world, &mut self.env, &FixedSelection::none());
        self.env.mask = mask;
        result
    }
}

impl<W: WorldAccess + std::fmt::Debug> std::fmt::Debug for EditSession<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("world", &self.world)
            .field("env", &self.env)
            .field("history", &self.history)
            .finish()
    }
}
