//! Headless aquarium run - loads textures, populates the scene and walks it.
//!
//! Usage: cargo run --release --bin simulate_scene -- [OPTIONS]
//!
//! Options:
//!   --seed <SEED>      Scene seed (default: from config, 12345)
//!   --frames <N>       Frames to simulate (default: 600)
//!   --config <PATH>    Scene config JSON (default: built-in aquarium)
//!   --assets <DIR>     Asset root the texture paths resolve under (default: ".")
//!   --save-config <PATH>  Write the effective config and continue
//!
//! Prints a JSON summary of the placement passes and the walk to stdout.

use std::path::PathBuf;
use std::time::Instant;

use glam::Vec2;
use serde_json::json;

use reefwalk::ambient::CruiserKind;
use reefwalk::assets::{AssetLoader, FsSource};
use reefwalk::core::input::MoveInput;
use reefwalk::core::time::FrameTimer;
use reefwalk::core::Result;
use reefwalk::locomotion::MoveOutcome;
use reefwalk::scene::{load_textures, SceneConfig, World};

fn main() {
    reefwalk::core::logging::init();

    if let Err(e) = run() {
        log::error!("simulate_scene failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let frames = parse_u64_arg(&args, "--frames").unwrap_or(600);
    let assets = parse_str_arg(&args, "--assets").unwrap_or_else(|| ".".to_string());

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => SceneConfig::load(&PathBuf::from(path))?,
        None => SceneConfig::default(),
    };
    if let Some(seed) = parse_u64_arg(&args, "--seed") {
        config.seed = seed;
    }
    if let Some(path) = parse_str_arg(&args, "--save-config") {
        config.save(&PathBuf::from(&path))?;
        log::info!("Wrote config to {}", path);
    }

    log::info!("Seed {}, {} frames, assets under {}", config.seed, frames, assets);

    let runtime = tokio::runtime::Runtime::new()?;
    let loader = AssetLoader::new(FsSource::new(&assets));
    let loaded = runtime.block_on(load_textures(&loader, &config.textures));

    let mut world = World::new(config);

    let start = Instant::now();
    let populate = world.populate(loaded);
    let populate_ms = start.elapsed().as_secs_f64() * 1000.0;

    let flat = world.flatten();

    let mut timer = FrameTimer::new();
    let mut committed = 0u64;
    let mut blocked = 0u64;
    let mut blocked_by = std::collections::BTreeMap::<&'static str, u64>::new();
    for frame in 0..frames {
        let report = world.tick(&scripted_input(frame));
        timer.tick();
        match report.outcome {
            MoveOutcome::Committed | MoveOutcome::Slid { .. } => committed += 1,
            MoveOutcome::Blocked { by } => {
                blocked += 1;
                *blocked_by.entry(by).or_default() += 1;
            }
            MoveOutcome::Idle => {}
        }
    }
    let walk_ms = f64::from(timer.average_delta_secs()) * timer.frame_count() as f64 * 1000.0;

    let view = world.viewpoint();
    let ambient = world.ambient();
    let summary = json!({
        "seed": world.config().seed,
        "textures": world.textures().len(),
        "populate": populate,
        "populate_ms": populate_ms,
        "flat_instances": flat.len(),
        "walk": {
            "frames": frames,
            "committed": committed,
            "blocked": blocked,
            "blocked_by": blocked_by,
            "final_position": [view.position.x, view.position.y, view.position.z],
            "elapsed_ms": walk_ms,
            "fps": timer.fps(),
            "avg_frame_ms": timer.average_delta_secs() * 1000.0,
            "last_frame_ms": timer.delta_secs() * 1000.0,
        },
        "ambient": {
            "agents": ambient.agent_count(),
            "bubbles": ambient.bubbles().len(),
            "plankton": ambient.plankton().len(),
            "reef_fish": ambient.reef_fish().len(),
            "sharks": ambient.cruisers(CruiserKind::Shark).len(),
            "open_water_fish": ambient.cruisers(CruiserKind::OpenWaterFish).len(),
            "rays": ambient.cruisers(CruiserKind::Ray).len(),
        },
        "logical_time": world.clock().elapsed(),
    });

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Walk toward the tank, sidestep it, carry on toward the hallway, with a
/// slow look sweep.
fn scripted_input(frame: u64) -> MoveInput {
    let phase = (frame / 90) % 4;
    let sweep = ((frame as f32) * 0.05).sin() * 2.0;
    MoveInput {
        forward: phase == 0 || phase == 2,
        back: false,
        left: phase == 1,
        right: phase == 3,
        look_delta: Vec2::new(sweep, 0.0),
    }
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
