use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use shadowline_app::runner::{self, RunOptions, DEFAULT_MAX_SECS};
use shadowline_app::script::{ScriptPlayer, TargetScript};
use shadowline_core::config::DetectionConfig;
use shadowline_core::constants::DT;
use shadowline_sim::engine::DetectionEngine;
use shadowline_sim::level::LevelDefinition;

// ============================================================================
// CLI Argument Parsing
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "shadowline", version, about = "Headless SHADOWLINE detection runner")]
struct Args {
    /// Level layout (detectors, audio zones, obstacles) as JSON
    #[arg(short, long)]
    level: PathBuf,

    /// Target path script as JSON
    #[arg(short, long)]
    script: PathBuf,

    /// Detection tuning overrides as JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds per tick
    #[arg(long, default_value_t = DT)]
    dt: f64,

    /// Upper bound on simulated seconds
    #[arg(long, default_value_t = DEFAULT_MAX_SECS)]
    max_secs: f64,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging when RUST_LOG is unset
    #[arg(short, long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let fallback = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.debug);

    ensure!(args.dt.is_finite() && args.dt > 0.0, "--dt must be positive");
    ensure!(args.max_secs.is_finite() && args.max_secs > 0.0, "--max-secs must be positive");

    let config = match &args.config {
        Some(path) => DetectionConfig::load(path)
            .with_context(|| format!("loading detection config {}", path.display()))?,
        None => DetectionConfig::default(),
    };
    debug!(?config, "detection config");

    let level = LevelDefinition::load(&args.level)
        .with_context(|| format!("loading level {}", args.level.display()))?;
    let script = TargetScript::load(&args.script)?;

    let mut engine = DetectionEngine::with_level(config, &level)
        .with_context(|| format!("registering sensors of level {}", args.level.display()))?;
    info!(
        detectors = engine.registry().detector_count(),
        audio_zones = engine.registry().audio_zone_count(),
        waypoints = script.waypoints.len(),
        "starting run"
    );

    let summary = runner::run(
        &mut engine,
        ScriptPlayer::new(script),
        RunOptions {
            dt: args.dt,
            max_secs: args.max_secs,
        },
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("ticks:            {}", summary.ticks);
        println!("elapsed:          {:.2}s", summary.elapsed_secs);
        println!("final state:      {:?} {}", summary.final_state, summary.final_state.indicator());
        println!("peak state:       {:?} {}", summary.peak_state, summary.peak_state.indicator());
        println!("peak strength:    {:.3}", summary.peak_strength);
        println!("transitions:      {}", summary.transitions);
        println!("sensor hits:      {}", summary.sensor_detections);
        println!("longest discover: {:.2}s", summary.longest_discovery_secs);
        println!("mission:          {:?}", summary.mission);
    }

    Ok(if summary.failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
