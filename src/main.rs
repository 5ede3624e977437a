use plife::{bench_step_curve, FrameLoop, NoInput, ScenarioConfig, Simulation, StatsSink};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file, looked up under `scenarios/` when not found as given
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Run without a window, logging stats instead of drawing
    #[arg(long)]
    headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 600)]
    steps: u64,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print the sequential vs parallel step timing curve and exit
    #[arg(long)]
    bench: bool,
}

fn scenario_path(file_name: &str) -> PathBuf {
    let given = PathBuf::from(file_name);
    if given.exists() {
        return given;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}

// load here to keep main clean
fn load_scenario(args: &Args) -> Result<ScenarioConfig> {
    let path = scenario_path(&args.file_name);
    let mut cfg = ScenarioConfig::from_path(&path)
        .with_context(|| format!("loading scenario {}", path.display()))?;
    if args.seed.is_some() {
        cfg.engine.seed = args.seed;
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.bench {
        bench_step_curve()?;
        return Ok(());
    }

    let cfg = load_scenario(&args)?;
    let mut simulation = Simulation::build(&cfg)?;

    if args.headless {
        let frame_loop = FrameLoop::new(simulation.engine.frame_rate).with_max_frames(args.steps);
        frame_loop.run(&mut simulation, &mut NoInput, &mut StatsSink::new(60));
        return Ok(());
    }

    #[cfg(feature = "viewer")]
    plife::run_2d(simulation);

    #[cfg(not(feature = "viewer"))]
    {
        tracing::warn!("built without the `viewer` feature, running headless");
        let frame_loop = FrameLoop::new(simulation.engine.frame_rate).with_max_frames(args.steps);
        frame_loop.run(&mut simulation, &mut NoInput, &mut StatsSink::new(60));
    }

    Ok(())
}
