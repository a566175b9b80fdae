//! Missile flight system: phase state machine, integration, and ground impact.
//!
//! Phases only ever advance: Ascending → Transition → Horizontal → Descent.
//! Speed is held at `FlightConfig::speed` in every phase; only direction
//! changes.

use glam::DVec3;
use hecs::{Entity, World};

use skyshield_core::components::{Missile, MissileFlight};
use skyshield_core::config::FlightConfig;
use skyshield_core::constants::*;
use skyshield_core::enums::{AudioCue, FlightPhase};
use skyshield_core::events::{AudioEvent, SimEvent};
use skyshield_core::state::ScoreView;
use skyshield_core::types::{safe_normalize, Position, Rotation, Velocity};

use crate::entity_id;
use crate::environment::Environment;
use crate::guidance;

/// Advance every missile by one tick.
///
/// Impacted missiles are reported and despawned before returning, so later
/// systems in the same tick never see them.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    config: &FlightConfig,
    dt: f64,
    environment: &dyn Environment,
    events: &mut Vec<SimEvent>,
    audio_events: &mut Vec<AudioEvent>,
    score: &mut ScoreView,
    despawn_buffer: &mut Vec<Entity>,
) {
    let mut impacts: Vec<(Entity, Position)> = Vec::new();

    for (entity, (_missile, flight, pos, vel, rot)) in world.query_mut::<(
        &Missile,
        &mut MissileFlight,
        &mut Position,
        &mut Velocity,
        &mut Rotation,
    )>() {
        let previous_phase = flight.phase;
        *vel = step(flight, pos, vel, config, dt);
        *pos = pos.advanced(vel, dt);
        *rot = rot.interp_to(target_rotation(flight.phase, vel), dt, config.rotation_speed);

        if flight.phase != previous_phase {
            tracing::debug!(
                missile = entity_id(entity),
                from = ?previous_phase,
                to = ?flight.phase,
                z = pos.z,
                "missile phase change"
            );
        }

        if flight.phase == FlightPhase::Descent {
            let ahead =
                Position::from(pos.as_dvec3() + vel.direction() * COLLISION_PROBE_LENGTH);
            if environment.probe(pos, &ahead) {
                impacts.push((entity, *pos));
            }
        }
    }

    for (missile, position) in impacts {
        explode(world, missile, position, config, events, audio_events);
        score.missiles_impacted += 1;
        despawn_buffer.push(missile);
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Run the phase machine for one tick and return the new velocity.
///
/// Phase checks use the position at the start of the tick; the caller
/// integrates afterwards.
pub fn step(
    flight: &mut MissileFlight,
    pos: &Position,
    vel: &Velocity,
    config: &FlightConfig,
    dt: f64,
) -> Velocity {
    let heading = safe_normalize(vel.as_dvec3(), DVec3::Z);

    match flight.phase {
        FlightPhase::Ascending => {
            if pos.z >= config.target_height {
                flight.phase = FlightPhase::Transition;
                flight.transition_elapsed = 0.0;
                flight.target_direction = pos.direction_to(&flight.target_point, heading);
            }
            Velocity::new(0.0, 0.0, config.speed)
        }
        FlightPhase::Transition => {
            flight.transition_elapsed += dt;
            if flight.transition_elapsed >= config.transition_time {
                flight.horizontal_start = *pos;
                flight.horizontal_end = guidance::horizontal_end_point(
                    pos,
                    &flight.target_point,
                    config.horizontal_distance,
                    config.horizontal_height,
                    flight.target_direction,
                );
                flight.phase = FlightPhase::Horizontal;
                return guidance::pure_pursuit(pos, &flight.horizontal_end, config.speed, heading);
            }
            let alpha = guidance::smoothstep(
                0.0,
                1.0,
                flight.transition_elapsed / config.transition_time,
            );
            let direction = guidance::blend_direction(flight.target_direction, alpha, heading);
            Velocity::along(direction, config.speed)
        }
        FlightPhase::Horizontal => {
            let v = guidance::pure_pursuit(pos, &flight.horizontal_end, config.speed, heading);
            if pos.range_to(&flight.horizontal_end) < HORIZONTAL_ARRIVAL_RADIUS {
                flight.phase = FlightPhase::Descent;
            }
            v
        }
        FlightPhase::Descent => {
            guidance::pure_pursuit(pos, &flight.target_point, config.speed, heading)
        }
    }
}

/// Orientation the missile body eases toward. The mesh's forward axis is
/// reversed, hence the pitch correction outside the climb.
pub fn target_rotation(phase: FlightPhase, vel: &Velocity) -> Rotation {
    if phase == FlightPhase::Ascending {
        return Rotation::new(ASCENT_PITCH_DEG, 0.0, 0.0);
    }
    Rotation::from_direction(vel.direction())
        .combined(Rotation::new(MESH_PITCH_CORRECTION_DEG, 0.0, 0.0))
}

/// Report a ground impact. The blast radius query only counts what it would
/// hit; no damage model is applied.
fn explode(
    world: &World,
    missile: Entity,
    position: Position,
    config: &FlightConfig,
    events: &mut Vec<SimEvent>,
    audio_events: &mut Vec<AudioEvent>,
) {
    let entities_in_radius = world
        .query::<&Position>()
        .iter()
        .filter(|(e, p)| *e != missile && p.range_to(&position) <= config.explosion_radius)
        .count();

    tracing::info!(
        missile = entity_id(missile),
        x = position.x,
        y = position.y,
        entities_in_radius,
        "missile impact"
    );

    events.push(SimEvent::MissileImpact {
        missile_id: entity_id(missile),
        position,
        entities_in_radius,
    });
    audio_events.push(AudioEvent {
        cue: AudioCue::Explosion,
        position,
    });
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    const DT: f64 = 1.0 / 60.0;

    fn fly(flight: &mut MissileFlight, pos: &mut Position, vel: &mut Velocity, config: &FlightConfig) {
        *vel = step(flight, pos, vel, config, DT);
        *pos = pos.advanced(vel, DT);
    }

    #[test]
    fn test_ascent_ends_at_target_height() {
        let config = FlightConfig::default();
        let mut flight = MissileFlight::launch(Position::ORIGIN);
        let mut pos = Position::ORIGIN;
        let mut vel = Velocity::new(0.0, 0.0, config.speed);

        let mut ticks = 0u32;
        while flight.phase == FlightPhase::Ascending {
            fly(&mut flight, &mut pos, &mut vel, &config);
            ticks += 1;
            assert!(ticks < 10_000, "missile never left Ascending");
        }
        // 20000 / 1500 = 13.33 s, plus the tick that sees the threshold.
        let secs = ticks as f64 * DT;
        assert!((secs - 13.333).abs() < 0.05, "left Ascending after {secs} s");
        assert_eq!(flight.transition_elapsed, 0.0);
    }

    #[test]
    fn test_transition_captures_bearing_and_end_point() {
        let config = FlightConfig::default();
        let mut flight = MissileFlight::launch(Position::ORIGIN);
        let mut pos = Position::new(30_000.0, 0.0, 20_000.0);
        let mut vel = Velocity::new(0.0, 0.0, config.speed);

        fly(&mut flight, &mut pos, &mut vel, &config);
        assert_eq!(flight.phase, FlightPhase::Transition);
        let expected = DVec3::new(-30_000.0, 0.0, -20_000.0).normalize();
        assert!((flight.target_direction - expected).length() < 1e-12);

        while flight.phase == FlightPhase::Transition {
            fly(&mut flight, &mut pos, &mut vel, &config);
        }
        assert_eq!(flight.phase, FlightPhase::Horizontal);
        assert_eq!(flight.horizontal_end.z, config.horizontal_height);
        let leg = flight
            .horizontal_start
            .horizontal_range_to(&flight.horizontal_end);
        assert!(leg > 0.0 && leg <= config.horizontal_distance + 1e-6);
        // The leg heads toward the target.
        assert!(flight.horizontal_end.x < flight.horizontal_start.x);
    }

    #[test]
    fn test_full_profile_reaches_target() {
        let config = FlightConfig::default();
        let mut flight = MissileFlight::launch(Position::ORIGIN);
        let mut pos = Position::new(20_000.0, -10_000.0, 100.0);
        let mut vel = Velocity::new(0.0, 0.0, config.speed);

        let mut phases = vec![flight.phase];
        for _ in 0..20_000 {
            fly(&mut flight, &mut pos, &mut vel, &config);
            assert_relative_eq!(vel.speed(), config.speed, epsilon = 1e-6);
            assert!(flight.phase >= *phases.last().unwrap(), "phase went backwards");
            if flight.phase != *phases.last().unwrap() {
                phases.push(flight.phase);
            }
            if pos.z <= 0.0 {
                break;
            }
        }
        assert_eq!(
            phases,
            vec![
                FlightPhase::Ascending,
                FlightPhase::Transition,
                FlightPhase::Horizontal,
                FlightPhase::Descent
            ]
        );
        assert!(pos.z <= 0.0, "missile should reach the ground");
        assert!(pos.horizontal_range_to(&Position::ORIGIN) < 200.0);
    }

    #[test]
    fn test_descent_is_pure_pursuit() {
        let config = FlightConfig::default();
        let mut flight = MissileFlight::launch(Position::new(1_000.0, 2_000.0, 0.0));
        flight.phase = FlightPhase::Descent;
        let pos = Position::new(1_000.0, 2_000.0, 9_000.0);
        let v = step(&mut flight, &pos, &Velocity::new(1_500.0, 0.0, 0.0), &config, DT);
        assert_relative_eq!(v.z, -config.speed, epsilon = 1e-9);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_target_keeps_heading() {
        let config = FlightConfig::default();
        let mut flight = MissileFlight::launch(Position::new(0.0, 0.0, 5_000.0));
        flight.phase = FlightPhase::Descent;
        let pos = Position::new(0.0, 0.0, 5_000.0);
        let vel = Velocity::new(0.0, 1_500.0, 0.0);
        let v = step(&mut flight, &pos, &vel, &config, DT);
        assert_eq!(v, vel);
    }

    #[test]
    fn test_target_rotation() {
        let up = target_rotation(FlightPhase::Ascending, &Velocity::new(0.0, 0.0, 1_500.0));
        assert_eq!(up, Rotation::new(-90.0, 0.0, 0.0));

        // Level flight along +x: the reversed mesh points pitch at 180.
        let level = target_rotation(FlightPhase::Horizontal, &Velocity::new(1_500.0, 0.0, 0.0));
        assert_relative_eq!(level.pitch, 180.0);
        assert_relative_eq!(level.yaw, 0.0);
    }

    #[test]
    fn test_descent_probe_spans_probe_length() {
        use std::cell::RefCell;

        use crate::environment::Environment;

        #[derive(Default)]
        struct Recorder(RefCell<Vec<(Position, Position)>>);

        impl Environment for Recorder {
            fn probe(&self, start: &Position, end: &Position) -> bool {
                self.0.borrow_mut().push((*start, *end));
                false
            }
        }

        let config = FlightConfig::default();
        let mut world = World::new();
        let mut flight = MissileFlight::launch(Position::ORIGIN);
        flight.phase = FlightPhase::Descent;
        world.spawn((
            Missile,
            flight,
            Position::new(3_000.0, 0.0, 4_000.0),
            Velocity::new(-900.0, 0.0, -1_200.0),
            Rotation::default(),
        ));

        let recorder = Recorder::default();
        let mut despawn = Vec::new();
        run(
            &mut world,
            &config,
            DT,
            &recorder,
            &mut Vec::new(),
            &mut Vec::new(),
            &mut ScoreView::default(),
            &mut despawn,
        );

        let probes = recorder.0.borrow();
        assert_eq!(probes.len(), 1, "one probe per descending missile");
        let (start, end) = probes[0];
        assert_relative_eq!(start.range_to(&end), COLLISION_PROBE_LENGTH, epsilon = 1e-9);
        // Pointed at the target point, straight down the pursuit line.
        let heading = (end.as_dvec3() - start.as_dvec3()).normalize();
        let to_target = (Position::ORIGIN.as_dvec3() - start.as_dvec3()).normalize();
        assert!((heading - to_target).length() < 1e-9);
    }

    #[test]
    fn test_ground_impact_reports_blast() {
        use crate::environment::FlatGround;

        let config = FlightConfig::default();
        let mut world = World::new();
        let mut flight = MissileFlight::launch(Position::ORIGIN);
        flight.phase = FlightPhase::Descent;
        let missile = world.spawn((
            Missile,
            flight,
            Position::new(0.0, 0.0, 60.0),
            Velocity::new(0.0, 0.0, -1_500.0),
            Rotation::default(),
        ));
        let bystander = world.spawn((Position::new(1_000.0, 0.0, 0.0),));
        let far = world.spawn((Position::new(10_000.0, 0.0, 0.0),));

        let mut events = Vec::new();
        let mut audio = Vec::new();
        let mut score = ScoreView::default();
        let mut despawn = Vec::new();
        run(
            &mut world,
            &config,
            DT,
            &FlatGround::default(),
            &mut events,
            &mut audio,
            &mut score,
            &mut despawn,
        );

        assert!(!world.contains(missile));
        assert!(world.contains(bystander) && world.contains(far));
        assert_eq!(score.missiles_impacted, 1);
        assert_eq!(audio.len(), 1);
        assert_eq!(audio[0].cue, AudioCue::Explosion);
        match &events[..] {
            [SimEvent::MissileImpact {
                entities_in_radius, ..
            }] => assert_eq!(*entities_in_radius, 1),
            other => panic!("expected one impact event, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn prop_speed_held_in_every_phase(
            x in -30_000.0f64..30_000.0,
            y in -30_000.0f64..30_000.0,
            ticks in 1usize..3_000,
        ) {
            let config = FlightConfig::default();
            let mut flight = MissileFlight::launch(Position::ORIGIN);
            let mut pos = Position::new(x, y, 19_000.0);
            let mut vel = Velocity::new(0.0, 0.0, config.speed);
            for _ in 0..ticks {
                fly(&mut flight, &mut pos, &mut vel, &config);
                prop_assert!((vel.speed() - config.speed).abs() < 1e-6);
                prop_assert!(pos.is_finite());
            }
        }
    }
}
