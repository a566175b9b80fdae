//! Events emitted by the simulation for UI and audio feedback.
//!
//! Entity handles cross this boundary as their `u64` bit patterns so that
//! events stay serializable without an ECS dependency.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::types::{Position, Velocity};

/// Structured simulation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A missile was seen for the 1st, 2nd or 3rd time.
    Sighting {
        missile_id: u64,
        kind: SightingKind,
        position: Position,
    },
    /// Fourth sighting: trajectory estimate; the record is latched afterwards.
    TrajectoryReport {
        missile_id: u64,
        velocity: Velocity,
        time_to_impact: f64,
        impact_point: Position,
    },
    /// One of the highest-threat records after a scan pass (rank starts at 1).
    ThreatSummary {
        rank: usize,
        missile_id: u64,
        threat_level: f64,
        position: Position,
        speed: f64,
    },
    /// An AA battery launched an interceptor.
    InterceptorLaunched {
        interceptor_id: u64,
        target_id: u64,
        position: Position,
    },
    /// An interceptor detonated and destroyed a missile.
    Detonation {
        kind: DetonationKind,
        interceptor_id: u64,
        missile_id: u64,
        position: Position,
    },
    /// A missile reached the ground and exploded.
    MissileImpact {
        missile_id: u64,
        position: Position,
        /// Live entities found inside the explosion radius.
        entities_in_radius: usize,
    },
    /// Operational diagnostic (missing radar, no target, cooldown, ...).
    Diagnostic { level: AlertLevel, message: String },
}

/// Human-readable notification for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    /// How long the message should stay on screen.
    pub display_secs: f64,
    pub tick: u64,
}

/// A sound cue to play at a location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioEvent {
    pub cue: AudioCue,
    pub position: Position,
}

impl SimEvent {
    pub fn diagnostic(level: AlertLevel, message: impl Into<String>) -> Self {
        Self::Diagnostic {
            level,
            message: message.into(),
        }
    }

    pub fn level(&self) -> AlertLevel {
        match self {
            Self::Sighting { .. } => AlertLevel::Warning,
            Self::TrajectoryReport { .. } => AlertLevel::Critical,
            Self::ThreatSummary { rank, .. } => match rank {
                1 => AlertLevel::Critical,
                2 => AlertLevel::Warning,
                _ => AlertLevel::Info,
            },
            Self::InterceptorLaunched { .. } => AlertLevel::Info,
            Self::Detonation { .. } | Self::MissileImpact { .. } => AlertLevel::Critical,
            Self::Diagnostic { level, .. } => *level,
        }
    }

    pub fn display_secs(&self) -> f64 {
        match self {
            Self::Sighting { .. } => SIGHTING_DISPLAY_SECS,
            Self::TrajectoryReport { .. } | Self::MissileImpact { .. } => TRAJECTORY_DISPLAY_SECS,
            Self::ThreatSummary { .. } => THREAT_SUMMARY_DISPLAY_SECS,
            Self::InterceptorLaunched { .. } | Self::Detonation { .. } => ENGAGEMENT_DISPLAY_SECS,
            Self::Diagnostic { .. } => DIAGNOSTIC_DISPLAY_SECS,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Sighting {
                missile_id,
                kind,
                position,
            } => format!(
                "RADAR: missile {missile_id:#x} {} at X={:.0} Y={:.0} Z={:.0}",
                kind.label(),
                position.x,
                position.y,
                position.z
            ),
            Self::TrajectoryReport {
                missile_id,
                velocity,
                time_to_impact,
                impact_point,
            } => format!(
                "RADAR: trajectory of missile {missile_id:#x}: velocity X={:.2} Y={:.2} Z={:.2}, \
                 time to impact {time_to_impact:.2}s, impact point X={:.0} Y={:.0} Z={:.0}",
                velocity.x,
                velocity.y,
                velocity.z,
                impact_point.x,
                impact_point.y,
                impact_point.z
            ),
            Self::ThreatSummary {
                rank,
                missile_id,
                threat_level,
                position,
                speed,
            } => format!(
                "RADAR #{rank}: missile {missile_id:#x} threat {threat_level:.2} at \
                 X={:.0} Y={:.0} Z={:.0}, speed {speed:.0}",
                position.x, position.y, position.z
            ),
            Self::InterceptorLaunched { target_id, .. } => {
                format!("AA: interceptor launched at missile {target_id:#x}")
            }
            Self::Detonation {
                kind, missile_id, ..
            } => match kind {
                DetonationKind::DirectHit => format!("AA: direct hit on missile {missile_id:#x}"),
                DetonationKind::Proximity => {
                    format!("AA: proximity kill on missile {missile_id:#x}")
                }
            },
            Self::MissileImpact {
                missile_id,
                position,
                entities_in_radius,
            } => format!(
                "IMPACT: missile {missile_id:#x} exploded at X={:.0} Y={:.0} Z={:.0}, \
                 {entities_in_radius} in blast radius",
                position.x, position.y, position.z
            ),
            Self::Diagnostic { message, .. } => message.clone(),
        }
    }

    /// Render as an alert stamped with `tick`.
    pub fn to_alert(&self, tick: u64) -> Alert {
        Alert {
            level: self.level(),
            message: self.message(),
            display_secs: self.display_secs(),
            tick,
        }
    }
}
