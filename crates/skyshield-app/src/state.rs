//! State shared between the runner and the game loop thread.

use serde::Serialize;
use thiserror::Error;

use skyshield_core::commands::SimCommand;
use skyshield_core::error::ConfigError;
use skyshield_core::events::SimEvent;
use skyshield_core::state::{ScoreView, SimSnapshot};

/// Commands sent from the operator console to the game loop thread.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopCommand {
    /// A command to forward to the simulation engine.
    Sim(SimCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Failures that end a run before it produces a summary.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to spawn the game loop thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("game loop thread panicked")]
    Panicked,
}

/// What happened during a run, accumulated tick by tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    /// Ticks the simulation actually advanced (paused ticks excluded).
    pub ticks: u64,
    pub simulated_secs: f64,
    pub sightings: usize,
    pub trajectory_reports: usize,
    pub launches: usize,
    pub detonations: usize,
    pub impacts: usize,
    pub score: ScoreView,
}

impl RunSummary {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Fold one tick's snapshot into the totals.
    pub fn record(&mut self, snapshot: &SimSnapshot) {
        self.ticks = snapshot.time.tick;
        self.simulated_secs = snapshot.time.elapsed_secs;
        self.score = snapshot.score;
        for event in &snapshot.events {
            match event {
                SimEvent::Sighting { .. } => self.sightings += 1,
                SimEvent::TrajectoryReport { .. } => self.trajectory_reports += 1,
                SimEvent::InterceptorLaunched { .. } => self.launches += 1,
                SimEvent::Detonation { .. } => self.detonations += 1,
                SimEvent::MissileImpact { .. } => self.impacts += 1,
                SimEvent::ThreatSummary { .. } | SimEvent::Diagnostic { .. } => {}
            }
        }
    }
}

/// True once nothing is left flying.
pub fn engagement_resolved(snapshot: &SimSnapshot) -> bool {
    snapshot.missiles.is_empty() && snapshot.interceptors.is_empty()
}
