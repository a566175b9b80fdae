//! Interceptor guidance system: boost leg, predictive homing, and detonation.

use hecs::{Entity, World};

use skyshield_core::components::{Interceptor, InterceptorFlight, Missile};
use skyshield_core::config::InterceptorConfig;
use skyshield_core::enums::{AudioCue, DetonationKind};
use skyshield_core::events::{AudioEvent, SimEvent};
use skyshield_core::state::ScoreView;
use skyshield_core::types::{Position, Rotation, Velocity};

use crate::engagement::Engagement;
use crate::entity_id;
use crate::guidance;

/// A detonation decided this tick.
#[derive(Debug, Clone, Copy)]
struct Detonation {
    kind: DetonationKind,
    interceptor: Entity,
    missile: Entity,
    position: Position,
}

/// Run guidance for every interceptor.
///
/// The direct-hit test uses the interceptor's position before it moves this
/// tick; the proximity sweep uses the position after. Each interceptor
/// detonates at most once, and a missile destroyed earlier in the tick is
/// not hit again.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    config: &InterceptorConfig,
    dt: f64,
    events: &mut Vec<SimEvent>,
    audio_events: &mut Vec<AudioEvent>,
    score: &mut ScoreView,
    despawn_buffer: &mut Vec<Entity>,
) {
    let interceptors: Vec<Entity> = world
        .query::<(&Interceptor, &InterceptorFlight)>()
        .iter()
        .map(|(e, _)| e)
        .collect();

    let mut destroyed: Vec<Entity> = Vec::new();

    for interceptor in interceptors {
        let Some(detonation) = guide(world, interceptor, config, dt, &destroyed) else {
            continue;
        };

        destroyed.push(detonation.missile);
        despawn_buffer.push(detonation.missile);
        despawn_buffer.push(detonation.interceptor);
        score.missiles_destroyed += 1;

        tracing::info!(
            interceptor = entity_id(detonation.interceptor),
            missile = entity_id(detonation.missile),
            kind = ?detonation.kind,
            "interceptor detonated"
        );
        events.push(SimEvent::Detonation {
            kind: detonation.kind,
            interceptor_id: entity_id(detonation.interceptor),
            missile_id: entity_id(detonation.missile),
            position: detonation.position,
        });
        audio_events.push(AudioEvent {
            cue: AudioCue::Explosion,
            position: detonation.position,
        });
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Move one interceptor and decide whether it detonates.
fn guide(
    world: &World,
    interceptor: Entity,
    config: &InterceptorConfig,
    dt: f64,
    destroyed: &[Entity],
) -> Option<Detonation> {
    let start = *world.get::<&Position>(interceptor).ok()?;
    let mut flight = (*world.get::<&InterceptorFlight>(interceptor).ok()?).clone();
    let target = world
        .get::<&Engagement>(interceptor)
        .ok()
        .and_then(|e| e.target)
        .filter(|t| !destroyed.contains(t));

    let mut rotation = None;
    let mut direct_hit = None;

    if !flight.homing {
        flight.traveled_distance += flight.speed * dt;
        if flight.traveled_distance >= flight.forward_distance {
            flight.homing = true;
            tracing::debug!(
                interceptor = entity_id(interceptor),
                traveled = flight.traveled_distance,
                "boost complete, homing"
            );
        }
    } else if let Some((target, target_pos, target_vel)) = target.and_then(|t| locate(world, t)) {
        let aim = guidance::predict_intercept_point(&target_pos, &target_vel, &start, flight.speed);
        flight.heading = start.direction_to(&aim, flight.heading);
        rotation = Some(Rotation::from_direction(flight.heading));
        if start.range_to(&target_pos) < config.hit_radius {
            direct_hit = Some(target);
        }
    }

    let velocity = Velocity::along(flight.heading, flight.speed);
    let position = start.advanced(&velocity, dt);

    if let Ok(mut p) = world.get::<&mut Position>(interceptor) {
        *p = position;
    }
    if let Ok(mut v) = world.get::<&mut Velocity>(interceptor) {
        *v = velocity;
    }
    if let (Some(r), Ok(mut current)) = (rotation, world.get::<&mut Rotation>(interceptor)) {
        *current = r;
    }
    if let Ok(mut f) = world.get::<&mut InterceptorFlight>(interceptor) {
        *f = flight;
    }

    if let Some(missile) = direct_hit {
        return Some(Detonation {
            kind: DetonationKind::DirectHit,
            interceptor,
            missile,
            position,
        });
    }
    sweep(world, interceptor, &position, config.sweep_radius, destroyed)
}

/// Position and velocity of a live missile. A missing velocity reads as
/// stationary.
fn locate(world: &World, missile: Entity) -> Option<(Entity, Position, Velocity)> {
    world.get::<&Missile>(missile).ok()?;
    let pos = *world.get::<&Position>(missile).ok()?;
    let vel = world
        .get::<&Velocity>(missile)
        .map(|v| *v)
        .unwrap_or(Velocity::ZERO);
    Some((missile, pos, vel))
}

/// First live missile inside `radius` of `position`.
fn sweep(
    world: &World,
    interceptor: Entity,
    position: &Position,
    radius: f64,
    destroyed: &[Entity],
) -> Option<Detonation> {
    world
        .query::<(&Missile, &Position)>()
        .iter()
        .find(|(missile, (_, p))| !destroyed.contains(missile) && p.range_to(position) < radius)
        .map(|(missile, _)| Detonation {
            kind: DetonationKind::Proximity,
            interceptor,
            missile,
            position: *position,
        })
}
