//! Game loop: runs the simulation engine headless or paced against the wall
//! clock.
//!
//! The paced loop owns its engine on a dedicated thread because it's cleaner
//! for ownership. Commands arrive via `mpsc` channel; the thread returns the
//! run summary when it finishes.

use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use skyshield_core::commands::SimCommand;
use skyshield_core::config::SimConfig;
use skyshield_core::error::ConfigError;
use skyshield_core::state::SimSnapshot;
use skyshield_sim::{SimulationEngine, TracingSink};

use crate::state::{engagement_resolved, LoopCommand, RunError, RunSummary};

/// Wall-clock duration of one tick at 1x speed.
pub fn tick_duration(tick_rate: f64) -> Duration {
    Duration::from_secs_f64(1.0 / tick_rate)
}

/// Number of ticks covering `seconds` of simulated time.
pub fn ticks_for(seconds: f64, tick_rate: f64) -> u64 {
    (seconds.max(0.0) * tick_rate).ceil() as u64
}

/// Engine with a defense site on the target point and one salvo in the air.
pub fn prepare_engine(config: SimConfig) -> Result<SimulationEngine, ConfigError> {
    let site = config.flight.target_point;
    let mut engine = SimulationEngine::new(config)?;
    engine.set_notification_sink(TracingSink);
    engine.setup_defense_site(site);
    let salvo = engine.spawn_salvo();
    tracing::info!(missiles = salvo.len(), "salvo launched");
    Ok(engine)
}

/// Tick as fast as possible for at most `max_ticks` simulated ticks.
/// Stops early once the engagement is resolved.
pub fn run_headless(engine: &mut SimulationEngine, max_ticks: u64) -> RunSummary {
    let mut summary = RunSummary::new(engine.config().seed);
    while engine.time().tick < max_ticks {
        let snapshot = engine.tick();
        summary.record(&snapshot);
        if engagement_resolved(&snapshot) {
            tracing::info!(tick = snapshot.time.tick, "engagement resolved");
            break;
        }
    }
    summary
}

/// Spawns the paced game loop in a new thread.
///
/// Returns the command sender for the console to use and the handle that
/// yields the run summary. Every snapshot is also sent to `snapshot_tx` when
/// one is given.
pub fn spawn_game_loop(
    config: SimConfig,
    max_ticks: u64,
    time_scale: f64,
    snapshot_tx: Option<mpsc::Sender<SimSnapshot>>,
) -> Result<
    (
        mpsc::Sender<LoopCommand>,
        JoinHandle<Result<RunSummary, ConfigError>>,
    ),
    RunError,
> {
    config.validate()?;
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let handle = std::thread::Builder::new()
        .name("skyshield-game-loop".into())
        .spawn(move || -> Result<RunSummary, ConfigError> {
            let mut engine = prepare_engine(config)?;
            engine.queue_command(SimCommand::SetTimeScale { scale: time_scale });
            Ok(run_game_loop(&mut engine, max_ticks, &cmd_rx, snapshot_tx))
        })?;

    Ok((cmd_tx, handle))
}

/// The paced loop. Runs until `max_ticks` simulated ticks or a Shutdown
/// command. A disconnected channel only means no more operator input.
fn run_game_loop(
    engine: &mut SimulationEngine,
    max_ticks: u64,
    cmd_rx: &mpsc::Receiver<LoopCommand>,
    snapshot_tx: Option<mpsc::Sender<SimSnapshot>>,
) -> RunSummary {
    let base_tick = tick_duration(engine.config().tick_rate);
    let mut summary = RunSummary::new(engine.config().seed);
    let mut next_tick_time = Instant::now();
    let mut console_open = true;

    while engine.time().tick < max_ticks {
        // 1. Drain all pending commands
        while console_open {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Sim(cmd)) => engine.queue_command(cmd),
                Ok(LoopCommand::Shutdown) => return summary,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    tracing::debug!("operator input closed");
                    console_open = false;
                }
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();
        summary.record(&snapshot);

        // 3. Forward the snapshot to any observer
        if let Some(tx) = &snapshot_tx {
            let _ = tx.send(snapshot);
        }

        // 4. Sleep until next tick, adjusting for time_scale
        let time_scale = engine.time_scale();
        let effective_tick_duration = if time_scale > 0.001 {
            base_tick.div_f64(time_scale)
        } else {
            base_tick
        };

        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind, reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
    summary
}
