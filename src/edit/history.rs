//! Undo/redo stacks of completed operations.

use std::collections::VecDeque;

use crate::edit::operation::Operation;

/// Bounded history of registered operations.
///
/// `done` is oldest-first; the newest operation is at the back. `undone`
/// is a stack whose top is the operation to redo next.
#[derive(Debug)]
pub struct EditHistory {
    done: VecDeque<Operation>,
    undone: Vec<Operation>,
    capacity: usize,
    next_id: u64,
}

impl EditHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            done: VecDeque::with_capacity(capacity),
            undone: Vec::new(),
            capacity: capacity.max(1),
            next_id: 1,
        }
    }

    /// Register a finished operation and return its id.
    ///
    /// A new edit invalidates everything that was undone. When the history
    /// is full the oldest entry is forgotten.
    pub fn push(&mut self, mut op: Operation) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        op.mark_registered(id);

        if !self.undone.is_empty() {
            log::debug!("Dropping {} redo entries", self.undone.len());
            self.undone.clear();
        }

        self.done.push_back(op);
        while self.done.len() > self.capacity {
            if let Some(evicted) = self.done.pop_front() {
                log::debug!("History full, forgetting {} #{:?}", evicted.name(), evicted.id());
            }
        }
        id
    }

    /// Take up to `count` operations to undo, newest first
    pub(crate) fn take_undo(&mut self, count: usize) -> Vec<Operation> {
        let count = count.min(self.done.len());
        let mut ops = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(op) = self.done.pop_back() {
                ops.push(op);
            }
        }
        ops
    }

    /// Put undone operations on the redo stack, in the order `take_undo` gave them
    pub(crate) fn push_undone(&mut self, ops: Vec<Operation>) {
        self.undone.extend(ops);
    }

    /// Take up to `count` operations to redo, oldest first
    pub(crate) fn take_redo(&mut self, count: usize) -> Vec<Operation> {
        let count = count.min(self.undone.len());
        let mut ops = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(op) = self.undone.pop() {
                ops.push(op);
            }
        }
        ops
    }

    /// Return redone operations to the history, in the order `take_redo` gave them
    pub(crate) fn push_redone(&mut self, ops: Vec<Operation>) {
        self.done.extend(ops);
        while self.done.len() > self.capacity {
            self.done.pop_front();
        }
    }

    /// Operations that can be undone
    pub fn len(&self) -> usize {
        self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    /// Operations that can be redone
    pub fn redo_len(&self) -> usize {
        self.undone.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent operation
    pub fn last(&self) -> Option<&Operation> {
        self.done.back()
    }

    /// Undoable operations, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Operation> {
        self.done.iter()
    }

    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
    }
}
