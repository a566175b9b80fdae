//! Simulation snapshot: the complete visible state after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{Alert, AudioEvent, SimEvent};
use crate::types::{Position, Rotation, SimTime, Velocity};

/// Complete state broadcast to observers after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub phase: SimPhase,
    pub missiles: Vec<MissileView>,
    pub interceptors: Vec<InterceptorView>,
    pub radars: Vec<RadarView>,
    pub batteries: Vec<BatteryView>,
    pub events: Vec<SimEvent>,
    pub alerts: Vec<Alert>,
    pub audio_events: Vec<AudioEvent>,
    pub score: ScoreView,
}

/// A live missile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissileView {
    pub id: u64,
    pub phase: FlightPhase,
    pub position: Position,
    pub velocity: Velocity,
    pub rotation: Rotation,
}

/// A live interceptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterceptorView {
    pub id: u64,
    pub target_id: Option<u64>,
    pub position: Position,
    pub homing: bool,
    pub traveled_distance: f64,
}

/// Radar sweep state and its detection table, highest threat first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarView {
    pub id: u64,
    pub position: Position,
    pub scan_angle: f64,
    pub tracks: Vec<TrackView>,
}

/// One detection record as seen by observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackView {
    pub missile_id: u64,
    pub position: Position,
    pub velocity: Velocity,
    pub predicted_position: Position,
    pub distance: f64,
    pub threat_level: f64,
    pub last_detection_time: f64,
    pub detection_count: u32,
    pub reported_trajectory: bool,
}

/// AA battery status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatteryView {
    pub id: u64,
    pub position: Position,
    pub cooldown_remaining: f64,
    pub rounds_fired: u32,
    pub fire_mode: FireMode,
}

/// Running totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreView {
    pub missiles_launched: u32,
    pub missiles_destroyed: u32,
    pub missiles_impacted: u32,
    pub interceptors_fired: u32,
}
