//! Edit engine demo: generates terrain in memory, then smooths, floods,
//! undoes and redoes while printing what each step did.
//!
//! Usage: cargo run --release --bin edit_demo -- [OPTIONS]
//!
//! Options:
//!   --size <BLOCKS>    Terrain side length (default: 48)
//!   --seed <SEED>      Terrain seed (default: 12345)
//!   --radius <R>       Smooth brush size (default: 5)
//!   --config <PATH>    Edit config JSON (default: built-in defaults)

use std::path::PathBuf;
use std::time::Instant;

use stratum::block::demo_ids::WATER;
use stratum::block::{BlockState, SimpleCatalog};
use stratum::brush::{BrushTool, SmoothBrush};
use stratum::core::types::BlockPos;
use stratum::core::EditConfig;
use stratum::edit::{EditSession, Operation, OperationReport};
use stratum::ops::{highest_terrain_block, FillMode, FloodFill};
use stratum::pattern::SingleBlockPattern;
use stratum::terrain::{TerrainGenerator, TerrainParams};
use stratum::world::{FixedSelection, MemoryWorld, WorldAccess};

fn main() {
    stratum::core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let size = parse_i32_arg(&args, "--size").unwrap_or(48);
    let seed = parse_u32_arg(&args, "--seed").unwrap_or(12345);
    let radius = parse_f64_arg(&args, "--radius").unwrap_or(5.0);
    let config_path = parse_str_arg(&args, "--config").map(PathBuf::from);

    let config = match config_path {
        Some(path) => match EditConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Failed to load {}: {}", path.display(), err);
                std::process::exit(1);
            }
        },
        None => EditConfig::default(),
    };

    println!("=== Stratum Edit Demo ===");
    println!("Terrain: {}x{} columns, seed {}", size, size, seed);
    println!("Brush:   smooth, size {}", radius);
    println!();

    let start = Instant::now();
    let generator = TerrainGenerator::new(TerrainParams { seed, ..Default::default() });
    let mut world = MemoryWorld::default();
    let placed = generator.populate(&mut world, (0, 0), (size - 1, size - 1));
    println!("Generated {} blocks in {:.1?}", placed, start.elapsed());

    let mut session = match EditSession::new(world, SimpleCatalog::demo(), config) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("Invalid config: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = run_demo(&mut session, size, radius) {
        eprintln!("Demo failed: {}", err);
        std::process::exit(1);
    }
}

fn run_demo(session: &mut EditSession<MemoryWorld>, size: i32, radius: f64) -> stratum::core::Result<()> {
    let center = size / 2;
    let surface = |session: &EditSession<MemoryWorld>| {
        let max_y = session.world().max_y();
        highest_terrain_block(session.world(), session.catalog(), center, center, 0, max_y, false)
    };
    let before = session.world().snapshot();

    let target = BlockPos::new(center, surface(&*session), center);
    let start = Instant::now();
    let report = BrushTool::new(SmoothBrush::new(4), SingleBlockPattern::new(BlockState::AIR))
        .with_size(radius)
        .apply(session, target)?;
    print_report(&report, start);

    let seed = BlockPos::new(center, surface(&*session) + 2, center);
    let start = Instant::now();
    let flood = FloodFill::new(SingleBlockPattern::new(BlockState::new(WATER)), 8.0, 3, FillMode::Column);
    let report = session.run(Operation::new(flood), &FixedSelection::point(seed))?;
    print_report(&report, start);

    println!("History: {} operations", session.history().len());

    let undone = session.undo(2)?;
    let restored = session.world().snapshot() == before;
    println!("Undid {} operations, world restored: {}", undone, restored);

    let redone = session.redo(2)?;
    println!("Redid {} operations, {} blocks in world", redone, session.world().block_count());
    Ok(())
}

fn print_report(report: &OperationReport, start: Instant) {
    println!(
        "{:<16} {:>6} changed {:>6} applied  {:.1?}",
        report.name,
        report.changed_blocks,
        report.stats.applied,
        start.elapsed()
    );
    if !report.missing.is_empty() {
        println!("  missing block types: {:?}", report.missing);
    }
}

fn parse_i32_arg(args: &[String], flag: &str) -> Option<i32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_f64_arg(args: &[String], flag: &str) -> Option<f64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
