//! Snapshot system: queries the ECS world and builds a complete SimSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use skyshield_core::components::*;
use skyshield_core::enums::{FireMode, SimPhase};
use skyshield_core::events::{Alert, AudioEvent, SimEvent};
use skyshield_core::state::*;
use skyshield_core::types::{Position, Rotation, SimTime, Velocity};

use crate::engagement::Engagement;
use crate::entity_id;
use crate::tracking::DetectionTable;

/// Everything a tick produced besides world state.
pub struct TickOutput {
    pub events: Vec<SimEvent>,
    pub alerts: Vec<Alert>,
    pub audio_events: Vec<AudioEvent>,
}

/// Build a complete SimSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: SimPhase,
    fire_interval: f64,
    fire_mode: FireMode,
    output: TickOutput,
    score: &ScoreView,
) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        phase,
        missiles: build_missiles(world),
        interceptors: build_interceptors(world),
        radars: build_radars(world),
        batteries: build_batteries(world, fire_interval, fire_mode),
        events: output.events,
        alerts: output.alerts,
        audio_events: output.audio_events,
        score: *score,
    }
}

fn build_missiles(world: &World) -> Vec<MissileView> {
    world
        .query::<(&Missile, &MissileFlight, &Position, &Velocity, &Rotation)>()
        .iter()
        .map(|(entity, (_, flight, pos, vel, rot))| MissileView {
            id: entity_id(entity),
            phase: flight.phase,
            position: *pos,
            velocity: *vel,
            rotation: *rot,
        })
        .collect()
}

fn build_interceptors(world: &World) -> Vec<InterceptorView> {
    world
        .query::<(&Interceptor, &InterceptorFlight, &Position, Option<&Engagement>)>()
        .iter()
        .map(|(entity, (_, flight, pos, engagement))| InterceptorView {
            id: entity_id(entity),
            target_id: engagement.and_then(|e| e.target).map(entity_id),
            position: *pos,
            homing: flight.homing,
            traveled_distance: flight.traveled_distance,
        })
        .collect()
}

fn build_radars(world: &World) -> Vec<RadarView> {
    world
        .query::<(&RadarSite, &Position, &RadarScan, &DetectionTable)>()
        .iter()
        .map(|(entity, (_, pos, scan, table))| RadarView {
            id: entity_id(entity),
            position: *pos,
            scan_angle: scan.scan_angle,
            tracks: table
                .records()
                .iter()
                .map(|r| TrackView {
                    missile_id: entity_id(r.missile),
                    position: r.position,
                    velocity: r.velocity,
                    predicted_position: r.predicted_position,
                    distance: r.distance,
                    threat_level: r.threat_level,
                    last_detection_time: r.last_detection_time,
                    detection_count: r.detection_count,
                    reported_trajectory: r.reported_trajectory,
                })
                .collect(),
        })
        .collect()
}

fn build_batteries(world: &World, fire_interval: f64, fire_mode: FireMode) -> Vec<BatteryView> {
    world
        .query::<(&AaSite, &Position, &AaBattery)>()
        .iter()
        .map(|(entity, (_, pos, battery))| BatteryView {
            id: entity_id(entity),
            position: *pos,
            cooldown_remaining: (fire_interval - battery.since_last_fire).max(0.0),
            rounds_fired: battery.rounds_fired,
            fire_mode,
        })
        .collect()
}
