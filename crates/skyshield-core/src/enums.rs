//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Missile flight phase. Variants are declared in flight order so the derived
/// ordering can be used to check that phases only ever advance.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum FlightPhase {
    /// Vertical climb to the target height.
    #[default]
    Ascending,
    /// Timed, smoothed turn from vertical toward the target bearing.
    Transition,
    /// Cruise toward the horizontal end point.
    Horizontal,
    /// Pure-pursuit dive onto the target point.
    Descent,
}

/// Classification of a radar sighting, keyed by how many times a missile
/// has been seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SightingKind {
    First,
    Second,
    Third,
    /// Fourth sighting: carries a full trajectory estimate and latches the record.
    TrajectoryReport,
}

impl SightingKind {
    /// Sighting kind for a detection count, if the count is reportable.
    pub fn from_count(count: u32) -> Option<Self> {
        match count {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            4 => Some(Self::TrajectoryReport),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::First => "first sighting",
            Self::Second => "second sighting",
            Self::Third => "third sighting",
            Self::TrajectoryReport => "trajectory report",
        }
    }
}

/// How an interceptor detonated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetonationKind {
    /// Closed within the hit radius of its assigned target.
    DirectHit,
    /// Any live missile entered the wider sweep radius.
    Proximity,
}

/// AA battery firing mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireMode {
    /// Fire whenever the cooldown has elapsed and a target is available.
    #[default]
    Auto,
    /// Fire only when a `Fire` command is pending.
    Manual,
}

/// Top-level run state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    #[default]
    Running,
    Paused,
}

/// Named sound cues for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    /// Radar contact ping.
    Ping,
    /// Interceptor launch.
    Launch,
    /// Missile ground impact.
    Explosion,
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}
