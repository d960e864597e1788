use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use platformer_sim::{
    SceneDef, Simulation,
    constants::{DEFAULT_TICK_HZ, DEFAULT_TICKS},
};
use tracing_subscriber::EnvFilter;

/// Run a platformer scene headless and report where every actor ends up.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Scene file (JSON).
    scene: PathBuf,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = DEFAULT_TICKS)]
    ticks: u64,

    /// Tick frequency in Hz.
    #[arg(long, default_value_t = DEFAULT_TICK_HZ)]
    hz: f32,

    /// Print the final actor states as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if !(args.hz.is_finite() && args.hz > 0.0) {
        bail!("--hz must be a positive number, got {}", args.hz);
    }
    let dt = 1.0 / args.hz;

    let scene = SceneDef::from_path(&args.scene)
        .with_context(|| format!("loading {}", args.scene.display()))?;
    let mut sim = Simulation::from_scene(&scene).context("building the simulation")?;

    log::info!("running {} ticks at {} Hz", args.ticks, args.hz);
    sim.run(args.ticks, dt)
        .with_context(|| format!("tick {}", sim.ticks()))?;

    let report = sim.report();
    for actor in &report {
        log::info!(
            "{}: center ({:.3}, {:.3}) velocity ({:.3}, {:.3}) below {} left {} right {} above {}",
            actor.name,
            actor.center[0],
            actor.center[1],
            actor.velocity[0],
            actor.velocity[1],
            actor.state.below,
            actor.state.left,
            actor.state.right,
            actor.state.above,
        );
    }
    for platform in sim.platforms() {
        let c = platform.bounds().center;
        log::info!("{}: center ({:.3}, {:.3})", platform.name, c.x, c.y);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
