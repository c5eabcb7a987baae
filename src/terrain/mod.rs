//! Procedural terrain for populating test and demo worlds

pub mod generator;
pub use generator::{TerrainGenerator, TerrainParams};
