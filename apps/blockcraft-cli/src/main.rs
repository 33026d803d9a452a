mod script;

use std::path::PathBuf;

use anyhow::Context;
use blockcraft_common::Material;
use blockcraft_kernel::{BlockStore, ClickOutcome, SimConfig, World};
use blockcraft_render::{DebugTextRenderer, RenderView, Renderer};
use blockcraft_terrain::{Heightmap, SceneryConfig, Terrain, TerrainMesh, scatter_trees};
use blockcraft_tools::{FrameStats, FrameTimer, WorldInspector, WorldSummary};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::script::ScriptedPlayer;

#[derive(Parser)]
#[command(name = "blockcraft-cli", about = "Voxel builder core: terrain and interaction")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, terrain and spawn info
    Info,
    /// Sample the heightmap at one point
    Height {
        #[arg(long, allow_hyphen_values = true)]
        x: f32,
        #[arg(long, allow_hyphen_values = true)]
        z: f32,
    },
    /// Print an ASCII elevation map around the origin
    Preview {
        /// Half-width of the sampled square in world units
        #[arg(short, long, default_value = "120")]
        extent: f32,
        /// Columns in the output
        #[arg(short, long, default_value = "64")]
        columns: usize,
    },
    /// Drive the controller with scripted pseudo-random input
    Simulate {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Seed for the input script
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Scatter trees and print statistics
    Scenery,
}

#[derive(Serialize)]
struct SimulationReport {
    seed: u64,
    summary: WorldSummary,
    placed: usize,
    removed: usize,
    refused: usize,
    timing: FrameStats,
    replay_matches: bool,
}

const RAMP: &[u8] = b" .:-=+*#%@";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let world = World::new(SimConfig::default())?;
            let mesh = TerrainMesh::build(
                world.terrain(),
                TerrainMesh::DEFAULT_SIZE,
                TerrainMesh::DEFAULT_SEGMENTS,
            );
            let (lo, hi) = mesh.elevation_range();
            let feet = world.player().feet;

            println!("blockcraft-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "terrain: {} vertices, {} triangles, elevation {lo:.2}..{hi:.2}, water {:.1}",
                mesh.vertex_count(),
                mesh.triangle_count(),
                world.terrain().water_level()
            );
            println!("spawn: ({:.2}, {:.2}, {:.2})", feet.x, feet.y, feet.z);
            println!(
                "materials: {}",
                Material::ALL.map(Material::name).join(", ")
            );
        }
        Commands::Height { x, z } => {
            let terrain = Heightmap::default();
            println!(
                "height({x}, {z}) = {:.4} (ground {:.4})",
                terrain.height_at(x, z),
                terrain.ground_at(x, z)
            );
        }
        Commands::Preview { extent, columns } => {
            anyhow::ensure!(extent > 0.0, "extent must be positive");
            anyhow::ensure!(columns >= 2, "need at least two columns");
            print!("{}", preview(&Heightmap::default(), extent, columns));
        }
        Commands::Simulate {
            frames,
            seed,
            config,
            json,
        } => {
            let config = match config {
                Some(path) => SimConfig::from_path(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => SimConfig::default(),
            };
            let report = simulate(config, frames, seed)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Simulation: seed={seed}, frames={frames}");
                println!("{}", report.summary);
                println!(
                    "clicks: placed={} removed={} refused={}",
                    report.placed, report.removed, report.refused
                );
                println!("timing: {}", report.timing);
                println!(
                    "Replay: {}",
                    if report.replay_matches { "OK" } else { "MISMATCH" }
                );
            }
        }
        Commands::Scenery => {
            let terrain = Heightmap::default();
            let scenery = scatter_trees(&terrain, &SceneryConfig::default());
            println!("trees: {}", scenery.tree_count);
            println!("blocks: {}", scenery.len());
            for material in [Material::Wood, Material::Leaf] {
                let n = scenery.blocks.values().filter(|m| **m == material).count();
                println!("  {material}: {n}");
            }
        }
    }

    Ok(())
}

fn simulate(config: SimConfig, frames: u64, seed: u64) -> anyhow::Result<SimulationReport> {
    let mut world = World::new(config)?;
    let mut player = ScriptedPlayer::new(seed);
    let mut timer = FrameTimer::default();
    let (mut placed, mut removed, mut refused) = (0, 0, 0);

    for _ in 0..frames {
        let input = player.frame().snapshot();
        timer.begin();
        let report = world.step(&input);
        timer.end();
        for outcome in &report.clicks {
            match outcome {
                ClickOutcome::Placed { .. } => placed += 1,
                ClickOutcome::Removed { .. } => removed += 1,
                ClickOutcome::Blocked(_) => refused += 1,
                ClickOutcome::Ignored | ClickOutcome::Missed => {}
            }
        }
    }

    tracing::debug!(
        "{}",
        DebugTextRenderer::new().render(&world, &RenderView::from_world(&world))
    );

    let replayed = BlockStore::replay(world.blocks().events());
    Ok(SimulationReport {
        seed,
        summary: WorldInspector::summary(&world),
        placed,
        removed,
        refused,
        timing: timer.stats(),
        replay_matches: replayed.state_hash() == world.blocks().state_hash(),
    })
}

fn preview<T: Terrain>(terrain: &T, extent: f32, columns: usize) -> String {
    // Terminal cells are about twice as tall as wide.
    let rows = (columns / 2).max(1);
    let step_x = 2.0 * extent / (columns - 1) as f32;
    let step_z = 2.0 * extent / rows.saturating_sub(1).max(1) as f32;

    let mut samples = Vec::with_capacity(rows * columns);
    for r in 0..rows {
        for c in 0..columns {
            let x = -extent + c as f32 * step_x;
            let z = -extent + r as f32 * step_z;
            samples.push(terrain.height_at(x, z));
        }
    }
    let water = terrain.water_level();
    let (lo, hi) = samples
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), h| {
            (lo.min(*h), hi.max(*h))
        });
    let span = (hi - lo).max(f32::EPSILON);

    let mut out = String::with_capacity(rows * (columns + 1));
    for row in samples.chunks(columns) {
        for &h in row {
            let ch = if h < water {
                '~'
            } else {
                let i = (((h - lo) / span) * (RAMP.len() - 1) as f32).round() as usize;
                RAMP[i.min(RAMP.len() - 1)] as char
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}
