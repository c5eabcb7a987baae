//! Brushes: point-centred strokes built on the edit engine
//!
//! A [`Brush`] decides which blocks a stroke touches; a [`BrushTool`] binds a
//! brush to a pattern, a size and an optional mask and turns each use into an
//! [`Operation`](crate::edit::Operation).

pub mod shape;
pub mod smooth;
pub mod gravity;
pub mod tool;

pub use shape::{BrushShape, ShapeBrush};
pub use smooth::SmoothBrush;
pub use gravity::GravityBrush;
pub use tool::{BrushStroke, BrushTool};

use std::fmt;

use crate::core::types::BlockPos;
use crate::core::Result;
use crate::edit::EditContext;
use crate::pattern::Pattern;

/// Shape or transformation applied around a clicked position
pub trait Brush: fmt::Debug {
    fn name(&self) -> &'static str;

    /// Issue the writes of one stroke centred on `pos`
    fn build(&mut self, edit: &mut EditContext<'_>, pos: BlockPos, pattern: &mut dyn Pattern, size: f64) -> Result<()>;
}
