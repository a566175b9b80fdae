//! ECS components for hecs entities.
//!
//! Components are plain data structs. Game logic lives in systems, not
//! components. Components that hold entity handles live in the sim crate.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::FlightPhase;
use crate::types::Position;

/// Marks an entity as a hostile missile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Missile;

/// Marks an entity as a friendly interceptor projectile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Interceptor;

/// Marks an entity as a radar site.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RadarSite;

/// Marks an entity as an AA battery.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AaSite;

/// Missile flight state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissileFlight {
    pub phase: FlightPhase,
    /// Fixed destination the missile dives onto.
    pub target_point: Position,
    /// Unit bearing toward the target, captured on entering Transition.
    pub target_direction: DVec3,
    /// Seconds spent in Transition.
    pub transition_elapsed: f64,
    /// Set once on entering Horizontal.
    pub horizontal_start: Position,
    /// Set once on entering Horizontal.
    pub horizontal_end: Position,
}

impl MissileFlight {
    /// Fresh state for a missile on the launch pad.
    pub fn launch(target_point: Position) -> Self {
        Self {
            phase: FlightPhase::Ascending,
            target_point,
            target_direction: DVec3::Z,
            transition_elapsed: 0.0,
            horizontal_start: Position::ORIGIN,
            horizontal_end: Position::ORIGIN,
        }
    }
}

/// Radar sweep state. The detection table is a separate component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadarScan {
    /// Current sweep angle in [0, 360).
    pub scan_angle: f64,
    /// Seconds accumulated since the last scan pass.
    pub since_last_scan: f64,
    /// Number of scan passes performed.
    pub passes: u64,
}

/// Interceptor flight state (the target handle is a separate component).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterceptorFlight {
    /// Current unit travel direction.
    pub heading: DVec3,
    pub speed: f64,
    /// Boost leg length before homing.
    pub forward_distance: f64,
    /// Distance flown during the boost leg.
    pub traveled_distance: f64,
    pub homing: bool,
}

/// AA battery firing state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AaBattery {
    /// Seconds since the last launch.
    pub since_last_fire: f64,
    /// A manual `Fire` command is waiting to be honored.
    pub fire_requested: bool,
    /// Interceptors launched by this battery.
    pub rounds_fired: u32,
}
