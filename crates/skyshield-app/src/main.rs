//! SKYSHIELD runner: seeds a salvo against a defended site and runs the
//! engagement.
//!
//! Usage:
//!   cargo run --release -p skyshield-app -- --seconds 90 --seed 7
//!   RUST_LOG=info cargo run -p skyshield-app -- --realtime --time-scale 2

use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;

use clap::Parser;

use skyshield_app::console;
use skyshield_app::game_loop;
use skyshield_app::state::{LoopCommand, RunError, RunSummary};
use skyshield_core::config::SimConfig;

#[derive(Parser)]
#[command(name = "skyshield")]
#[command(about = "Run a SKYSHIELD missile-defense engagement")]
struct Args {
    /// JSON config file; missing fields fall back to defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated seconds to run at most
    #[arg(long, default_value_t = 120.0)]
    seconds: f64,

    /// Override the config's RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the salvo size
    #[arg(long)]
    missiles: Option<usize>,

    /// Pace ticks against the wall clock and read operator commands from stdin
    #[arg(long)]
    realtime: bool,

    /// Initial time scale for --realtime
    #[arg(long, default_value_t = 1.0)]
    time_scale: f64,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(summary) => {
            print_summary(&summary, args.json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("skyshield: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<RunSummary, RunError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(missiles) = args.missiles {
        config.scenario.missile_count = missiles;
    }
    config.validate()?;

    let max_ticks = game_loop::ticks_for(args.seconds, config.tick_rate);

    if !args.realtime {
        let mut engine = game_loop::prepare_engine(config)?;
        return Ok(game_loop::run_headless(&mut engine, max_ticks));
    }

    let target = config.flight.target_point;
    let (cmd_tx, handle) = game_loop::spawn_game_loop(config, max_ticks, args.time_scale, None)?;
    spawn_console(cmd_tx, target);

    let summary = handle.join().map_err(|_| RunError::Panicked)??;
    Ok(summary)
}

/// Forward stdin lines to the game loop until it hangs up.
fn spawn_console(cmd_tx: mpsc::Sender<LoopCommand>, target: skyshield_core::types::Position) {
    let spawned = std::thread::Builder::new()
        .name("skyshield-console".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                match console::parse_line(&line, target) {
                    Some(command) => {
                        if cmd_tx.send(command).is_err() {
                            break;
                        }
                    }
                    None => eprintln!("unrecognised command: {}", line.trim()),
                }
            }
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "console unavailable, running without operator input");
    }
}

fn print_summary(summary: &RunSummary, json: bool) {
    if json {
        match serde_json::to_string_pretty(summary) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("skyshield: failed to encode summary: {e}"),
        }
        return;
    }

    let score = &summary.score;
    println!("=== ENGAGEMENT SUMMARY ===");
    println!("  Seed:                0x{:08x}", summary.seed);
    println!(
        "  Simulated:           {:.1}s ({} ticks)",
        summary.simulated_secs, summary.ticks
    );
    println!("  Missiles launched:   {}", score.missiles_launched);
    println!("  Missiles destroyed:  {}", score.missiles_destroyed);
    println!("  Missiles impacted:   {}", score.missiles_impacted);
    println!("  Interceptors fired:  {}", score.interceptors_fired);
    println!("  Radar sightings:     {}", summary.sightings);
    println!("  Trajectory reports:  {}", summary.trajectory_reports);
}
