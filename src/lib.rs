//! Stratum - transactional bulk edits for block-grid worlds
//!
//! An edit is described as an [`edit::Operation`], run against a world through
//! an [`edit::EditSession`], committed in attachment-safe order and kept in
//! the session history for undo/redo.

pub mod core;
pub mod math;
pub mod block;
pub mod world;
pub mod pattern;
pub mod edit;
pub mod ops;
pub mod brush;
pub mod terrain;
