//! Tests for the simulation engine, radar tracking, fire control, and the
//! full engagement pipeline.

use hecs::Entity;

use skyshield_core::commands::SimCommand;
use skyshield_core::components::Missile;
use skyshield_core::config::SimConfig;
use skyshield_core::enums::*;
use skyshield_core::error::ConfigError;
use skyshield_core::events::SimEvent;
use skyshield_core::types::{Position, Velocity};

use crate::engine::SimulationEngine;
use crate::environment::FlatGround;
use crate::notify::RecordingSink;
use crate::tracking::DetectionRecord;
use crate::world_setup;

fn engine_with(config: SimConfig) -> SimulationEngine {
    SimulationEngine::new(config).unwrap()
}

/// Config whose radar scans on every tick.
fn scan_every_tick() -> SimConfig {
    let mut config = SimConfig::default();
    config.radar.scan_interval = config.dt();
    config
}

/// A missile that the flight system leaves alone.
fn parked_missile(engine: &mut SimulationEngine, position: Position) -> Entity {
    engine
        .world_mut()
        .spawn((Missile, position, Velocity::ZERO))
}

fn record(engine: &SimulationEngine, radar: Entity, missile: Entity) -> Option<DetectionRecord> {
    engine
        .detections(radar)
        .into_iter()
        .find(|r| r.missile == missile)
}

// ---- Construction and commands ----

#[test]
fn test_new_rejects_invalid_config() {
    let mut config = SimConfig::default();
    config.radar.scan_interval = 0.0;
    assert!(matches!(
        SimulationEngine::new(config),
        Err(ConfigError::Invalid {
            field: "radar.scan_interval",
            ..
        })
    ));
}

#[test]
fn test_tick_advances_time() {
    let mut engine = engine_with(SimConfig::default());
    for _ in 0..60 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 60);
    assert!((engine.time().elapsed_secs - 1.0).abs() < 1e-9);
}

#[test]
fn test_pause_stops_simulation() {
    let mut engine = engine_with(SimConfig::default());
    let missile = engine.launch_missile(Position::new(5_000.0, 0.0, 100.0), Position::ORIGIN);
    engine.tick();
    let before = *engine.world().get::<&Position>(missile).unwrap();

    engine.queue_command(SimCommand::Pause);
    let snap = engine.tick();
    assert_eq!(snap.phase, SimPhase::Paused);
    assert_eq!(snap.time.tick, 1);
    engine.tick();
    assert_eq!(*engine.world().get::<&Position>(missile).unwrap(), before);

    engine.queue_command(SimCommand::Resume);
    let snap = engine.tick();
    assert_eq!(snap.phase, SimPhase::Running);
    assert_eq!(snap.time.tick, 2);
}

#[test]
fn test_set_time_scale_clamped() {
    let mut engine = engine_with(SimConfig::default());
    engine.queue_command(SimCommand::SetTimeScale { scale: 2.5 });
    engine.tick();
    assert_eq!(engine.time_scale(), 2.5);

    engine.queue_command(SimCommand::SetTimeScale { scale: 100.0 });
    engine.tick();
    assert_eq!(engine.time_scale(), 8.0);

    engine.queue_command(SimCommand::SetTimeScale { scale: f64::NAN });
    engine.tick();
    assert_eq!(engine.time_scale(), 8.0);
}

#[test]
fn test_launch_command_spawns_missile() {
    let mut engine = engine_with(SimConfig::default());
    engine.queue_command(SimCommand::LaunchMissile {
        from: Position::new(-20_000.0, 0.0, 100.0),
        target: Position::ORIGIN,
    });
    let snap = engine.tick();
    assert_eq!(snap.missiles.len(), 1);
    assert_eq!(snap.missiles[0].phase, FlightPhase::Ascending);
    assert_eq!(snap.score.missiles_launched, 1);
}

#[test]
fn test_destroy_is_idempotent() {
    let mut engine = engine_with(SimConfig::default());
    let missile = engine.launch_missile(Position::new(5_000.0, 0.0, 100.0), Position::ORIGIN);
    engine.destroy(missile);
    engine.destroy(missile);
    let snap = engine.tick();
    assert!(snap.missiles.is_empty());
}

// ---- Determinism ----

fn salvo_run(seed: u64, ticks: usize) -> Vec<String> {
    let mut config = SimConfig::default();
    config.seed = seed;
    let mut engine = engine_with(config);
    engine.setup_defense_site(Position::ORIGIN);
    engine.spawn_salvo();
    (0..ticks)
        .map(|_| serde_json::to_string(&engine.tick()).unwrap())
        .collect()
}

#[test]
fn test_determinism_same_seed() {
    let a = salvo_run(12345, 600);
    let b = salvo_run(12345, 600);
    for (i, (ja, jb)) in a.iter().zip(&b).enumerate() {
        assert_eq!(ja, jb, "snapshots diverged at tick {i}");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let a = salvo_run(111, 1);
    let b = salvo_run(222, 1);
    assert_ne!(a, b, "different seeds should launch from different points");
}

// ---- Missile flight ----

#[test]
fn test_ascent_lasts_target_height_over_speed() {
    let mut engine = engine_with(SimConfig::default());
    engine.launch_missile(Position::ORIGIN, Position::new(10_000.0, 0.0, 0.0));

    // 20000 / 1500 = 13.33 s = 800 ticks.
    for _ in 0..790 {
        let snap = engine.tick();
        assert_eq!(snap.missiles[0].phase, FlightPhase::Ascending);
    }
    for _ in 0..15 {
        engine.tick();
    }
    let snap = engine.tick();
    assert_eq!(snap.missiles[0].phase, FlightPhase::Transition);
}

#[test]
fn test_speed_held_through_engine() {
    let mut engine = engine_with(SimConfig::default());
    engine.launch_missile(Position::new(15_000.0, 15_000.0, 100.0), Position::ORIGIN);
    let mut last_phase = FlightPhase::Ascending;
    for _ in 0..2_400 {
        let snap = engine.tick();
        let Some(m) = snap.missiles.first() else {
            break;
        };
        assert!((m.velocity.speed() - 1_500.0).abs() < 1e-6);
        assert!(m.phase >= last_phase, "phase regressed");
        last_phase = m.phase;
    }
    assert_eq!(last_phase, FlightPhase::Descent);
}

#[test]
fn test_unopposed_missile_impacts() {
    let mut engine = engine_with(SimConfig::default());
    let sink = RecordingSink::default();
    engine.set_notification_sink(sink.clone());
    let missile = engine.launch_missile(Position::new(10_000.0, 0.0, 100.0), Position::ORIGIN);

    let mut impact = None;
    for _ in 0..6_000 {
        let snap = engine.tick();
        impact = snap.events.into_iter().find_map(|e| match e {
            SimEvent::MissileImpact { position, .. } => Some(position),
            _ => None,
        });
        if impact.is_some() {
            break;
        }
    }
    let position = impact.expect("missile should reach the ground");
    assert!(position.z <= 100.0);
    assert!(position.horizontal_range_to(&Position::ORIGIN) < 200.0);
    assert!(!engine.world().contains(missile));
    assert_eq!(engine.score().missiles_impacted, 1);
    assert!(sink
        .audio_events()
        .iter()
        .any(|a| a.cue == AudioCue::Explosion));
    assert!(sink.alerts().iter().any(|a| a.message.starts_with("IMPACT")));
}

#[test]
fn test_injected_environment_changes_impact() {
    let mut engine =
        engine_with(SimConfig::default()).with_environment(FlatGround { height: 5_000.0 });
    engine.launch_missile(Position::new(10_000.0, 0.0, 100.0), Position::ORIGIN);

    let mut impact_z = None;
    for _ in 0..6_000 {
        let snap = engine.tick();
        if let Some(SimEvent::MissileImpact { position, .. }) = snap
            .events
            .iter()
            .find(|e| matches!(e, SimEvent::MissileImpact { .. }))
        {
            impact_z = Some(position.z);
            break;
        }
    }
    let z = impact_z.expect("missile should hit the raised ground");
    // The forward probe touches the plane up to one probe length early.
    assert!(z > 4_900.0 && z <= 5_100.0, "impact at z={z}");
}

// ---- Radar ----

#[test]
fn test_sector_detection_only_inside_beam() {
    let config = scan_every_tick();
    // 300 deg/s at 60 Hz: one full rotation every 72 ticks.
    let ticks_per_rotation = (360.0 / (config.radar.scan_speed * config.dt())).round() as usize;
    let mut engine = engine_with(config);
    let radar = world_setup::spawn_radar(engine.world_mut(), Position::ORIGIN);

    for rotation in 0..5 {
        // A fresh missile each rotation, so the latch never stops the count.
        // Bearing 0 from the radar, inside range and band.
        let missile = parked_missile(&mut engine, Position::new(10_000.0, 0.0, 5_000.0));
        let mut last_count = 0;
        let mut detections = 0;
        for _ in 0..ticks_per_rotation {
            let snap = engine.tick();
            let count = record(&engine, radar, missile).map_or(0, |r| r.detection_count);
            if count > last_count {
                detections += 1;
                let angle = snap.radars[0].scan_angle;
                let off = skyshield_core::types::wrap_degrees(angle);
                assert!(
                    off.abs() <= 10.0 + 1e-9,
                    "rotation {rotation}: detected at scan angle {angle}"
                );
            }
            last_count = count;
        }
        assert!(detections >= 1, "rotation {rotation}: missile never detected");
        engine.destroy(missile);
    }
}

#[test]
fn test_out_of_band_never_detected() {
    let mut engine = engine_with(scan_every_tick());
    let radar = world_setup::spawn_radar(engine.world_mut(), Position::ORIGIN);
    let low = parked_missile(&mut engine, Position::new(10_000.0, 0.0, 500.0));
    let high = parked_missile(&mut engine, Position::new(0.0, 10_000.0, 30_000.0));
    let far = parked_missile(&mut engine, Position::new(-26_000.0, 0.0, 5_000.0));
    let seen = parked_missile(&mut engine, Position::new(0.0, -10_000.0, 5_000.0));

    for _ in 0..300 {
        engine.tick();
    }
    assert!(record(&engine, radar, low).is_none());
    assert!(record(&engine, radar, high).is_none());
    assert!(record(&engine, radar, far).is_none());
    assert!(record(&engine, radar, seen).is_some());
}

#[test]
fn test_three_scans_enter_engagement_pool() {
    let mut engine = engine_with(scan_every_tick());
    let radar = world_setup::spawn_radar(engine.world_mut(), Position::ORIGIN);
    let missile = parked_missile(&mut engine, Position::new(0.0, 8_000.0, 6_000.0));

    let mut ticks = 0;
    while record(&engine, radar, missile).map_or(0, |r| r.detection_count) < 3 {
        assert!(
            engine.missiles_detected_at_least(radar, 3).is_empty(),
            "pool filled before the third sighting"
        );
        engine.tick();
        ticks += 1;
        assert!(ticks < 1_000, "missile never reached three sightings");
    }
    assert_eq!(engine.missiles_detected_at_least(radar, 3), vec![missile]);

    engine.destroy(missile);
    assert!(engine.missiles_detected_at_least(radar, 3).is_empty());
}

#[test]
fn test_sightings_then_trajectory_report_latch() {
    let mut engine = engine_with(scan_every_tick());
    let radar = world_setup::spawn_radar(engine.world_mut(), Position::ORIGIN);
    let missile = parked_missile(&mut engine, Position::new(10_000.0, 0.0, 5_000.0));
    engine.world_mut().insert_one(missile, Velocity::new(-100.0, 0.0, -200.0)).unwrap();

    let mut kinds = Vec::new();
    let mut ticks = 0;
    while !record(&engine, radar, missile).is_some_and(|r| r.reported_trajectory) {
        let snap = engine.tick();
        for event in snap.events {
            match event {
                SimEvent::Sighting { kind, .. } => kinds.push(kind),
                SimEvent::TrajectoryReport { .. } => kinds.push(SightingKind::TrajectoryReport),
                _ => {}
            }
        }
        ticks += 1;
        assert!(ticks < 1_000);
    }
    assert_eq!(
        kinds,
        vec![
            SightingKind::First,
            SightingKind::Second,
            SightingKind::Third,
            SightingKind::TrajectoryReport
        ]
    );

    let latched = record(&engine, radar, missile).unwrap();
    assert_eq!(latched.detection_count, 4);

    // Keep it in the beam but somewhere else: the latched record must not move.
    *engine.world_mut().get::<&mut Position>(missile).unwrap() =
        Position::new(12_000.0, 0.0, 6_000.0);
    for _ in 0..120 {
        let snap = engine.tick();
        assert!(
            !snap.events.iter().any(|e| matches!(
                e,
                SimEvent::Sighting { .. } | SimEvent::TrajectoryReport { .. }
            )),
            "latched record reported again"
        );
    }
    assert_eq!(record(&engine, radar, missile), Some(latched));
}

#[test]
fn test_latched_record_ages_out() {
    let mut engine = engine_with(scan_every_tick());
    let radar = world_setup::spawn_radar(engine.world_mut(), Position::ORIGIN);
    let missile = parked_missile(&mut engine, Position::new(10_000.0, 0.0, 5_000.0));

    while !record(&engine, radar, missile).is_some_and(|r| r.reported_trajectory) {
        engine.tick();
    }
    let latched_at = record(&engine, radar, missile).unwrap().last_detection_time;

    // Still present just under five seconds later.
    while engine.time().elapsed_secs < latched_at + 4.9 {
        engine.tick();
    }
    assert!(record(&engine, radar, missile).is_some_and(|r| r.reported_trajectory));

    // Gone once more than five seconds have passed. The missile is still in
    // the sweep, so a fresh unlatched record may already have replaced it.
    while engine.time().elapsed_secs < latched_at + 5.2 {
        engine.tick();
    }
    assert!(record(&engine, radar, missile).map_or(true, |r| !r.reported_trajectory));
}

#[test]
fn test_stale_record_removed_without_latch() {
    let mut engine = engine_with(scan_every_tick());
    let radar = world_setup::spawn_radar(engine.world_mut(), Position::ORIGIN);
    let missile = parked_missile(&mut engine, Position::new(10_000.0, 0.0, 5_000.0));

    while record(&engine, radar, missile).is_none() {
        engine.tick();
    }
    // Drop below the band so it is never refreshed.
    *engine.world_mut().get::<&mut Position>(missile).unwrap() =
        Position::new(10_000.0, 0.0, 200.0);
    let seen_at = record(&engine, radar, missile).unwrap().last_detection_time;
    while engine.time().elapsed_secs < seen_at + 5.2 {
        engine.tick();
    }
    assert!(record(&engine, radar, missile).is_none());
    assert!(engine.detections(radar).is_empty());
}

#[test]
fn test_threat_summary_ranks() {
    let mut engine = engine_with(scan_every_tick());
    world_setup::spawn_radar(engine.world_mut(), Position::ORIGIN);
    for i in 0..4 {
        // Same bearing, increasing range: closer is more threatening.
        parked_missile(
            &mut engine,
            Position::new(5_000.0 + 4_000.0 * i as f64, 0.0, 5_000.0),
        );
    }

    let mut ranks = Vec::new();
    for _ in 0..10 {
        let snap = engine.tick();
        ranks = snap
            .events
            .iter()
            .filter_map(|e| match e {
                SimEvent::ThreatSummary {
                    rank, threat_level, ..
                } => Some((*rank, *threat_level)),
                _ => None,
            })
            .collect();
        if !ranks.is_empty() {
            break;
        }
    }
    assert_eq!(ranks.len(), 3, "only the top three are reported");
    assert_eq!(ranks.iter().map(|r| r.0).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert!(ranks[0].1 >= ranks[1].1 && ranks[1].1 >= ranks[2].1);
}

#[test]
fn test_impact_estimate_through_engine() {
    let mut engine = engine_with(scan_every_tick());
    let radar = world_setup::spawn_radar(engine.world_mut(), Position::ORIGIN);
    let missile = parked_missile(&mut engine, Position::new(10_000.0, 0.0, 6_000.0));
    engine
        .world_mut()
        .insert_one(missile, Velocity::new(0.0, 0.0, -1_000.0))
        .unwrap();

    while record(&engine, radar, missile).is_none() {
        engine.tick();
    }
    let estimate = engine.impact_estimate(radar, missile).unwrap();
    assert!((estimate.time_to_ground - 6.0).abs() < 1e-9);
    assert_eq!(estimate.impact_point.z, 0.0);

    engine.destroy(missile);
    assert!(engine.impact_estimate(radar, missile).is_err());
}

// ---- Fire control ----

#[test]
fn test_manual_fire_command() {
    let mut config = scan_every_tick();
    config.battery.fire_mode = FireMode::Manual;
    let mut engine = engine_with(config);
    let (radar, battery) = engine.setup_defense_site(Position::ORIGIN);
    let missile = parked_missile(&mut engine, Position::new(12_000.0, 0.0, 8_000.0));

    // Past the cooldown with a confirmed target, but no request.
    let mut ticks = 0;
    while engine.time().elapsed_secs < 2.5
        || !engine.missiles_detected_at_least(radar, 3).contains(&missile)
    {
        engine.tick();
        ticks += 1;
        assert!(ticks < 1_000, "target never confirmed");
    }
    assert_eq!(engine.select_target(battery), Some(missile));
    assert_eq!(engine.score().interceptors_fired, 0);

    engine.queue_command(SimCommand::Fire);
    let snap = engine.tick();
    assert_eq!(snap.score.interceptors_fired, 1);
    assert_eq!(snap.interceptors.len(), 1);
    assert_eq!(
        snap.interceptors[0].target_id,
        Some(crate::entity_id(missile))
    );

    // Switching to auto fires on the next cooldown without a request.
    engine.queue_command(SimCommand::SetFireMode {
        mode: FireMode::Auto,
    });
    for _ in 0..130 {
        engine.tick();
    }
    assert!(engine.score().interceptors_fired >= 2);
}

#[test]
fn test_battery_without_radar_reports() {
    let mut engine = engine_with(SimConfig::default());
    world_setup::spawn_battery(engine.world_mut(), Position::ORIGIN, None);
    let mut diagnostics = 0;
    for _ in 0..200 {
        let snap = engine.tick();
        diagnostics += snap
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::Diagnostic { level: AlertLevel::Critical, .. }))
            .count();
    }
    assert!(diagnostics > 0);
    assert_eq!(engine.score().interceptors_fired, 0);
}

// ---- End to end ----

#[test]
fn test_full_engagement() {
    let mut engine = engine_with(SimConfig::default());
    let sink = RecordingSink::default();
    engine.set_notification_sink(sink.clone());
    engine.setup_defense_site(Position::ORIGIN);
    let salvo = engine.spawn_salvo();
    assert_eq!(salvo.len(), 3);

    let mut trajectory_reports = 0;
    let mut launches = 0;
    for _ in 0..(90 * 60) {
        let snap = engine.tick();
        for event in &snap.events {
            match event {
                SimEvent::TrajectoryReport { .. } => trajectory_reports += 1,
                SimEvent::InterceptorLaunched { .. } => launches += 1,
                _ => {}
            }
        }
        if snap.missiles.is_empty() {
            break;
        }
    }

    let score = engine.score();
    assert_eq!(score.missiles_launched, 3);
    assert!(trajectory_reports >= 1, "radar never completed a track");
    assert!(launches >= 1, "battery never fired");
    assert_eq!(score.interceptors_fired as usize, launches);
    assert!(
        score.missiles_destroyed >= 1,
        "no missile destroyed: {score:?}"
    );
    assert_eq!(
        score.missiles_destroyed + score.missiles_impacted,
        3,
        "every missile should end destroyed or impacted: {score:?}"
    );

    let audio = sink.audio_events();
    assert!(audio.iter().any(|a| a.cue == AudioCue::Ping));
    assert!(audio.iter().any(|a| a.cue == AudioCue::Launch));
    assert!(sink
        .alerts()
        .iter()
        .any(|a| a.level == AlertLevel::Critical));
}

#[test]
fn test_snapshot_serializes() {
    let mut engine = engine_with(SimConfig::default());
    engine.setup_defense_site(Position::ORIGIN);
    engine.spawn_salvo();
    let snap = engine.tick();
    let json = serde_json::to_string(&snap).unwrap();
    assert!(json.contains("\"missiles\""));
    assert_eq!(snap.radars.len(), 1);
    assert_eq!(snap.batteries.len(), 1);
    assert_eq!(snap.missiles.len(), 3);
    assert!(json.len() < 100_000, "snapshot was {} bytes", json.len());
}
