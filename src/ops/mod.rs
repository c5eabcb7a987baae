//! Bulk edit algorithms, each an [`OperationBody`](crate::edit::OperationBody)

pub mod region_fill;
pub mod flood_fill;
pub mod kernel;
pub mod height_map;
pub mod replay;

pub use region_fill::RegionFill;
pub use flood_fill::{FillMode, FloodFill};
pub use kernel::{GaussianKernel, HeightMapFilter, Kernel, LinearKernel};
pub use height_map::{highest_terrain_block, resample_heights, HeightResample};
pub use replay::{Replay, ReplayDirection};
