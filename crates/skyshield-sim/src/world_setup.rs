//! Entity spawn factories for setting up the simulation world.
//!
//! Creates missiles, radar sites, AA batteries, and interceptors with
//! appropriate component bundles.

use glam::DVec3;
use hecs::{Entity, World};

use skyshield_core::components::*;
use skyshield_core::config::{FlightConfig, InterceptorConfig};
use skyshield_core::constants::ASCENT_PITCH_DEG;
use skyshield_core::types::{Position, Rotation, Velocity};

use crate::engagement::{Engagement, RadarLink};
use crate::tracking::DetectionTable;

/// Spawn a missile on the pad at `from`, bound for `target`.
pub fn spawn_missile(
    world: &mut World,
    from: Position,
    target: Position,
    config: &FlightConfig,
) -> Entity {
    world.spawn((
        Missile,
        from,
        Velocity::new(0.0, 0.0, config.speed),
        Rotation::new(ASCENT_PITCH_DEG, 0.0, 0.0),
        MissileFlight::launch(target),
    ))
}

/// Spawn a radar site with an empty detection table.
pub fn spawn_radar(world: &mut World, position: Position) -> Entity {
    world.spawn((
        RadarSite,
        position,
        RadarScan::default(),
        DetectionTable::default(),
    ))
}

/// Spawn an AA battery. With `radar = None` the battery links the first
/// radar it finds when it is first ready to fire.
pub fn spawn_battery(world: &mut World, position: Position, radar: Option<Entity>) -> Entity {
    world.spawn((AaSite, position, AaBattery::default(), RadarLink { radar }))
}

/// Spawn an interceptor at `from` flying along `heading` (unit length),
/// assigned to `target`.
pub fn spawn_interceptor(
    world: &mut World,
    from: Position,
    heading: DVec3,
    target: Entity,
    config: &InterceptorConfig,
) -> Entity {
    world.spawn((
        Interceptor,
        from,
        Velocity::along(heading, config.speed),
        Rotation::from_direction(heading),
        InterceptorFlight {
            heading,
            speed: config.speed,
            forward_distance: config.forward_distance,
            traveled_distance: 0.0,
            homing: false,
        },
        Engagement {
            target: Some(target),
        },
    ))
}

/// A radar and an AA battery linked to it, side by side at `position`.
pub fn setup_defense_site(world: &mut World, position: Position) -> (Entity, Entity) {
    let radar = spawn_radar(world, position);
    let battery = spawn_battery(world, position, Some(radar));
    (radar, battery)
}
