use criterion::{criterion_group, criterion_main, Criterion, black_box};

use stratum::block::demo_ids::{GLASS, WATER};
use stratum::block::{BlockState, SimpleCatalog};
use stratum::brush::{BrushTool, SmoothBrush};
use stratum::core::types::BlockPos;
use stratum::core::EditConfig;
use stratum::edit::{EditSession, Operation};
use stratum::math::CuboidRegion;
use stratum::ops::{FillMode, FloodFill, GaussianKernel, HeightMapFilter, RegionFill};
use stratum::pattern::SingleBlockPattern;
use stratum::terrain::{TerrainGenerator, TerrainParams};
use stratum::world::{FixedSelection, MemoryWorld};

fn terrain_world(size: i32) -> MemoryWorld {
    let generator = TerrainGenerator::new(TerrainParams::default());
    let mut world = MemoryWorld::default();
    generator.populate(&mut world, (0, 0), (size - 1, size - 1));
    world
}

fn session(world: MemoryWorld) -> EditSession<MemoryWorld> {
    EditSession::new(world, SimpleCatalog::demo(), EditConfig::default()).unwrap()
}

fn bench_region_fill_32(c: &mut Criterion) {
    let region = CuboidRegion::new(BlockPos::new(0, 64, 0), BlockPos::new(31, 95, 31));

    c.bench_function("region_fill_32", |b| {
        b.iter(|| {
            let mut session = session(MemoryWorld::default());
            let fill = RegionFill::new(SingleBlockPattern::new(BlockState::new(GLASS)));
            session.run(Operation::new(fill), &FixedSelection::region(black_box(region))).unwrap()
        });
    });
}

fn bench_flood_fill_column(c: &mut Criterion) {
    let world = terrain_world(32);

    c.bench_function("flood_fill_column_r12", |b| {
        b.iter(|| {
            let mut session = session(clone_world(&world));
            let flood = FloodFill::new(SingleBlockPattern::new(BlockState::new(WATER)), 12.0, 8, FillMode::Column);
            session.run(Operation::new(flood), &FixedSelection::point(BlockPos::new(16, 70, 16))).unwrap()
        });
    });
}

fn bench_smooth_brush(c: &mut Criterion) {
    let world = terrain_world(32);

    c.bench_function("smooth_brush_r5", |b| {
        b.iter(|| {
            let mut session = session(clone_world(&world));
            BrushTool::new(SmoothBrush::new(4), SingleBlockPattern::new(BlockState::AIR))
                .with_size(5.0)
                .apply(&mut session, black_box(BlockPos::new(16, 40, 16)))
                .unwrap()
        });
    });
}

fn bench_height_filter_64(c: &mut Criterion) {
    let filter = HeightMapFilter::new(GaussianKernel::new(5, 1.0));
    let heights: Vec<i32> = (0..64 * 64).map(|i| ((i * 7919) % 31) as i32).collect();

    c.bench_function("height_filter_64x64", |b| {
        b.iter(|| filter.filter(black_box(&heights), 64, 64));
    });
}

fn clone_world(world: &MemoryWorld) -> MemoryWorld {
    let mut copy = MemoryWorld::default();
    for (pos, state) in world.snapshot() {
        copy.place(pos, state);
    }
    copy
}

criterion_group!(
    benches,
    bench_region_fill_32,
    bench_flood_fill_column,
    bench_smooth_brush,
    bench_height_filter_64,
);
criterion_main!(benches);
