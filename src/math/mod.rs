//! Grid geometry

pub mod region;
pub mod direction;

pub use region::CuboidRegion;
pub use direction::Direction;
