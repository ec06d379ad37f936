//! Map exporter binary: generates demo terrain and writes it as a CHUNKED map.
//!
//! Usage: cargo run --release --bin export_map -- --out <PATH> [OPTIONS]
//!
//! Options:
//!   --out <PATH>      Output map file (required)
//!   --scale <N>       World edge is 2^N cells (default: from config, 8)
//!   --seed <SEED>     Terrain seed (default: from config, 12345)
//!   --config <JSON>   Export config file (limits, world scale, terrain)
//!   --fog <N>         Override the map's fog distance

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use chunked::core::{Result, logging};
use chunked::core::types::IVec3;
use chunked::entity::MapEntity;
use chunked::export::{ExportConfig, LogProgress, check_output_path, prepare_map};
use chunked::format::save_map;
use chunked::terrain::TerrainGenerator;
use chunked::vars::{VarRegistry, VarValue, flags};
use chunked::voxel::VoxelGrid;

/// Entity type of the player spawn point
const ENT_PLAYERSTART: i32 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_with_timestamps();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Export failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let out = PathBuf::from(parse_str_arg(&args, "--out").unwrap_or_default());
    check_output_path(&out)?;

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => ExportConfig::load(path)?,
        None => ExportConfig::default(),
    };
    if let Some(scale) = parse_u32_arg(&args, "--scale") {
        config.world_scale = scale;
    }
    if let Some(seed) = parse_u32_arg(&args, "--seed") {
        config.terrain.seed = seed;
    }
    config.validate()?;

    println!("=== Chunked Map Exporter ===");
    println!("World:  {}^3 cells (scale {})", 1u64 << config.world_scale, config.world_scale);
    println!("Seed:   {}", config.terrain.seed);
    println!("Limits: floor {}, {} packed / {} bound bytes",
        config.limits.min_scale, config.limits.max_packed, config.limits.max_bound);
    println!("Output: {}", out.display());
    println!();

    let start = Instant::now();
    let mut grid = VoxelGrid::new(config.world_scale);
    let generator = TerrainGenerator::new(config.terrain.clone());
    generator.fill_grid(&mut grid);
    let generated = start.elapsed();

    let center = grid.side() / 2;
    let ground = generator.height_at(center as f32, center as f32).ceil() as i32 + 1;
    let entities = vec![MapEntity::new(IVec3::new(center, ground, center), ENT_PLAYERSTART)];

    let mut vars = VarRegistry::new();
    vars.register("fog", VarValue::Int(4000), flags::OVERRIDE);
    vars.register("fogcolour", VarValue::Int(0x8099B3), flags::OVERRIDE);
    vars.register("maptitle", VarValue::Str(String::new()), flags::OVERRIDE);
    vars.set("maptitle", VarValue::Str(format!("terrain {}", config.terrain.seed)))?;
    if let Some(fog) = parse_i32_arg(&args, "--fog") {
        vars.set("fog", VarValue::Int(fog))?;
    }

    let map = prepare_map(&grid, &entities, &vars, config.limits, LogProgress)?;
    save_map(&out, &map).await?;
    let elapsed = start.elapsed();

    let payload: usize = map.chunks.iter().map(|c| c.packed_len()).sum();
    let raw = grid.bounds().volume() as f64 * 4.0;
    println!();
    println!("=== Export Complete ===");
    println!("Terrain: {} solid cells in {:.1}s", grid.solid_count(), generated.as_secs_f64());
    println!("Chunks:  {} ({:.1} KB packed, {:.1}x)",
        map.chunks.len(), payload as f64 / 1024.0, raw / payload.max(1) as f64);
    println!("Ents:    {}", map.entities.count);
    println!("Vars:    {}", map.vars.len());
    println!("Total:   {:.1}s", elapsed.as_secs_f64());

    Ok(())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_i32_arg(args: &[String], flag: &str) -> Option<i32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
