//! Noise-based height field terrain

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::block::demo_ids::{BEDROCK, DIRT, GRASS, SAND, STATIONARY_WATER, STONE};
use crate::block::BlockState;
use crate::core::types::BlockPos;
use crate::world::{MemoryWorld, WorldAccess};

/// Parameters controlling terrain generation
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainParams {
    pub seed: u32,
    pub scale: f64,        // Horizontal scale (larger = smoother)
    pub base_height: f64,  // Height of a zero noise sample
    pub height_scale: f64, // Vertical amplitude around the base height
    pub octaves: usize,    // FBM octaves (detail levels)
    pub persistence: f64,  // FBM persistence (0.5 typical)
    pub lacunarity: f64,   // FBM lacunarity (2.0 typical)
    pub sea_level: i32,    // Columns below this are flooded
    pub dirt_depth: i32,   // Soil layers under the surface block
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            scale: 48.0,
            base_height: 40.0,
            height_scale: 16.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            sea_level: 36,
            dirt_depth: 3,
        }
    }
}

/// Height field terrain from fractal Brownian motion (FBM)
pub struct TerrainGenerator {
    params: TerrainParams,
    noise: Fbm<Perlin>,
}

impl TerrainGenerator {
    pub fn new(params: TerrainParams) -> Self {
        let noise = Fbm::<Perlin>::new(params.seed)
            .set_octaves(params.octaves)
            .set_persistence(params.persistence)
            .set_lacunarity(params.lacunarity);

        Self { params, noise }
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Continuous terrain height at world position (x, z)
    pub fn height_at(&self, x: f64, z: f64) -> f64 {
        let sample = self.noise.get([x / self.params.scale, z / self.params.scale]);
        self.params.base_height + sample * self.params.height_scale
    }

    /// Y of the surface block of column (x, z), at least 1
    pub fn column_height(&self, x: i32, z: i32) -> i32 {
        (self.height_at(x as f64, z as f64).floor() as i32).max(1)
    }

    /// Fill the columns of `[min_x, max_x] x [min_z, max_z]` with terrain.
    ///
    /// Each column is bedrock at y=0, stone, `dirt_depth` layers of dirt and a
    /// grass top. Columns whose top lies below sea level get a sand top and
    /// still water up to sea level. Returns the number of blocks placed.
    pub fn populate(&self, world: &mut MemoryWorld, min: (i32, i32), max: (i32, i32)) -> usize {
        let ceiling = world.max_y();
        let mut placed = 0;

        for x in min.0..=max.0 {
            for z in min.1..=max.1 {
                let top = self.column_height(x, z).min(ceiling);
                let soil = (top - self.params.dirt_depth).max(1);

                world.place(BlockPos::new(x, 0, z), BlockState::new(BEDROCK));
                world.place_column(x, z, 1, soil - 1, &BlockState::new(STONE));
                world.place_column(x, z, soil, top - 1, &BlockState::new(DIRT));

                let surface = if top < self.params.sea_level { SAND } else { GRASS };
                world.place(BlockPos::new(x, top, z), BlockState::new(surface));
                placed += top as usize + 1;

                let water_top = self.params.sea_level.min(ceiling);
                if top < water_top {
                    world.place_column(x, z, top + 1, water_top, &BlockState::new(STATIONARY_WATER));
                    placed += (water_top - top) as usize;
                }
            }
        }

        log::debug!(
            "Populated terrain over {}x{} columns ({} blocks)",
            max.0 - min.0 + 1,
            max.1 - min.1 + 1,
            placed
        );
        placed
    }
}
