//! Headless simulation runner.
//!
//! Run with: cargo run -p timeline-core
//!
//! Examples:
//!   cargo run -p timeline-core -- --turns 60 --seed 7
//!   cargo run -p timeline-core -- --config engine.toml --output-dir output

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use timeline_core::{Engine, EngineConfig, ReportWriter};
use timeline_events::EngineSnapshot;

/// Headless timeline simulation runner
#[derive(Parser, Debug)]
#[command(name = "timeline_sim")]
#[command(about = "Runs the threat-driven mission engine for N turns")]
struct Args {
    /// Number of turns to simulate
    #[arg(long, default_value_t = 30)]
    turns: u64,

    /// Random seed for the session
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Path to an engine configuration TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Resume from a snapshot instead of starting fresh
    #[arg(long)]
    from_snapshot: Option<PathBuf>,

    /// Output directory for reports and snapshots
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Turns between snapshot writes (0 disables periodic snapshots)
    #[arg(long, default_value_t = 10)]
    snapshot_interval: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let mut engine = match &args.from_snapshot {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let snapshot = EngineSnapshot::from_json(&json)?;
            tracing::info!(turn = snapshot.world.turn_number, "resuming from snapshot");
            Engine::restore(snapshot, config, args.seed)
        }
        None => Engine::new(config, args.seed),
    };
    engine.set_auto_resolve_player(true);

    std::fs::create_dir_all(&args.output_dir)?;
    let mut writer = ReportWriter::new(args.output_dir.join("reports.jsonl"))?;
    let snapshot_path = args.output_dir.join("snapshot.json");

    for i in 1..=args.turns {
        let report = engine.advance_turn();

        if !report.emergencies.is_empty() {
            tracing::info!(
                turn = report.stamp.turn,
                date = %report.stamp.date,
                emergencies = report.emergencies.len(),
                "emergencies detected"
            );
        }
        writer.log(&report)?;

        if args.snapshot_interval > 0 && i % args.snapshot_interval == 0 {
            std::fs::write(&snapshot_path, engine.snapshot().to_json()?)?;
        }
    }

    writer.flush()?;
    std::fs::write(&snapshot_path, engine.snapshot().to_json()?)?;

    let world = engine.world();
    tracing::info!(
        turn = world.turn_number,
        timeline_stability = world.timeline_stability,
        faction_influence = world.faction_influence,
        exposure_risk = world.exposure_risk,
        missions = engine.history().len(),
        "run complete"
    );

    Ok(())
}
