//! Commands sent to the simulation from outside.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::FireMode;
use crate::types::Position;

/// All external actions the engine accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimCommand {
    /// Launch a missile from `from` that will dive onto `target`.
    LaunchMissile { from: Position, target: Position },
    /// Request a shot from every battery (honored in manual fire mode).
    Fire,
    /// Switch all batteries between automatic and manual firing.
    SetFireMode { mode: FireMode },
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
    /// Set time scale for paced runners (1.0 = real time, clamped to [0, 8]).
    SetTimeScale { scale: f64 },
}
