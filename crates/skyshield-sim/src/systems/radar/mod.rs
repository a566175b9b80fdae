//! Radar sweep, detection, and tracking.
//!
//! Each tick every radar site advances its sweep. Every `scan_interval`
//! seconds it performs a scan pass over all live missiles, updating its
//! `DetectionTable`, and reports the top threats. Stale records are aged out
//! every tick.

pub mod prediction;
pub mod sweep;
pub mod threat;

use hecs::{Entity, World};

use skyshield_core::components::{Missile, RadarScan, RadarSite};
use skyshield_core::config::RadarConfig;
use skyshield_core::constants::*;
use skyshield_core::enums::{AudioCue, SightingKind};
use skyshield_core::error::ImpactError;
use skyshield_core::events::{AudioEvent, SimEvent};
use skyshield_core::types::{Position, Velocity};

use crate::entity_id;
use crate::tracking::{DetectionRecord, DetectionTable};

pub use prediction::{calculate_impact_point, time_to_impact, ImpactEstimate};

/// A missile as seen by a scan pass.
#[derive(Debug, Clone, Copy)]
struct Contact {
    missile: Entity,
    position: Position,
    velocity: Velocity,
}

/// Run sweep, scan, and aging for every radar site.
///
/// `now` is the simulation time stamped on detections.
pub fn run(
    world: &mut World,
    config: &RadarConfig,
    dt: f64,
    now: f64,
    events: &mut Vec<SimEvent>,
    audio_events: &mut Vec<AudioEvent>,
) {
    // Snapshot of live missiles before taking mutable radar borrows.
    let contacts: Vec<Contact> = world
        .query::<(&Missile, &Position, &Velocity)>()
        .iter()
        .map(|(missile, (_, position, velocity))| Contact {
            missile,
            position: *position,
            velocity: *velocity,
        })
        .collect();

    for (radar, (_site, radar_pos, scan, table)) in
        world.query_mut::<(&RadarSite, &Position, &mut RadarScan, &mut DetectionTable)>()
    {
        scan.scan_angle = sweep::advance_sweep(scan.scan_angle, config.scan_speed, dt);

        scan.since_last_scan += dt;
        if scan.since_last_scan >= config.scan_interval {
            scan.since_last_scan = 0.0;
            scan.passes += 1;
            scan_pass(
                radar_pos,
                scan.scan_angle,
                table,
                &contacts,
                config,
                now,
                events,
                audio_events,
            );
        }

        for missile in table.remove_stale(now) {
            tracing::debug!(
                radar = entity_id(radar),
                missile = entity_id(missile),
                "detection record aged out"
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn scan_pass(
    radar_pos: &Position,
    scan_angle: f64,
    table: &mut DetectionTable,
    contacts: &[Contact],
    config: &RadarConfig,
    now: f64,
    events: &mut Vec<SimEvent>,
    audio_events: &mut Vec<AudioEvent>,
) {
    for contact in contacts {
        if !sweep::in_scan_volume(radar_pos, &contact.position, scan_angle, config) {
            continue;
        }
        if let Some(event) = observe(table, contact, radar_pos, config, now) {
            tracing::info!(
                missile = entity_id(contact.missile),
                scan_angle,
                "{}",
                event.message()
            );
            events.push(event);
            audio_events.push(AudioEvent {
                cue: AudioCue::Ping,
                position: *radar_pos,
            });
        }
    }

    table.sort_by_threat();

    let live = |missile: Entity| contacts.iter().any(|c| c.missile == missile);
    let summaries = table
        .records()
        .iter()
        .filter(|r| live(r.missile))
        .take(TOP_THREATS_REPORTED);
    for (i, record) in summaries.enumerate() {
        tracing::trace!(
            rank = i + 1,
            missile = entity_id(record.missile),
            threat = record.threat_level,
            "threat summary"
        );
        events.push(SimEvent::ThreatSummary {
            rank: i + 1,
            missile_id: entity_id(record.missile),
            threat_level: record.threat_level,
            position: record.position,
            speed: record.velocity.speed(),
        });
    }
}

/// Fold one in-beam contact into the table. Returns the sighting event to
/// report, if any.
fn observe(
    table: &mut DetectionTable,
    contact: &Contact,
    radar_pos: &Position,
    config: &RadarConfig,
    now: f64,
) -> Option<SimEvent> {
    if let Some(record) = table.get_mut(contact.missile) {
        if record.reported_trajectory {
            return None;
        }
        refresh(record, contact, radar_pos, config, now);
        if record.detection_count < MAX_DETECTION_COUNT {
            record.detection_count += 1;
        }
        return sighting_event(record);
    }

    let mut record = DetectionRecord {
        missile: contact.missile,
        position: contact.position,
        velocity: contact.velocity,
        predicted_position: contact.position,
        distance: 0.0,
        threat_level: 0.0,
        last_detection_time: now,
        detection_count: 1,
        reported_trajectory: false,
    };
    refresh(&mut record, contact, radar_pos, config, now);
    sighting_event(table.insert(record)?)
}

fn refresh(
    record: &mut DetectionRecord,
    contact: &Contact,
    radar_pos: &Position,
    config: &RadarConfig,
    now: f64,
) {
    record.position = contact.position;
    record.velocity = contact.velocity;
    record.distance = radar_pos.range_to(&contact.position);
    record.last_detection_time = now;
    if let Some(predicted) =
        prediction::predict_position(&record.position, &record.velocity, config.prediction_time)
    {
        record.predicted_position = predicted;
    }
    record.threat_level = threat::threat_level(
        radar_pos,
        &record.position,
        &record.velocity,
        record.distance,
        config,
    );
}

/// Event for the record's current count. The fourth sighting carries the
/// trajectory estimate and latches the record.
fn sighting_event(record: &mut DetectionRecord) -> Option<SimEvent> {
    let kind = SightingKind::from_count(record.detection_count)?;
    let missile_id = entity_id(record.missile);
    if kind == SightingKind::TrajectoryReport {
        let tti = time_to_impact(&record.position, &record.velocity);
        record.reported_trajectory = true;
        return Some(SimEvent::TrajectoryReport {
            missile_id,
            velocity: record.velocity,
            time_to_impact: tti,
            impact_point: record.position.advanced(&record.velocity, tti),
        });
    }
    Some(SimEvent::Sighting {
        missile_id,
        kind,
        position: record.position,
    })
}

/// Live missiles the radar has seen at least `count` times, in table order
/// (highest threat first as of the last scan).
pub fn missiles_detected_at_least(world: &World, radar: Entity, count: u32) -> Vec<Entity> {
    let Ok(table) = world.get::<&DetectionTable>(radar) else {
        return Vec::new();
    };
    table
        .detected_at_least(count)
        .filter(|&missile| world.get::<&Missile>(missile).is_ok())
        .collect()
}

/// The first `n` records of the radar's table.
pub fn top_threats(world: &World, radar: Entity, n: usize) -> Vec<DetectionRecord> {
    world
        .get::<&DetectionTable>(radar)
        .map(|table| table.top(n).to_vec())
        .unwrap_or_default()
}

/// Ground impact estimate for a tracked missile, from its record.
pub fn impact_estimate(
    world: &World,
    radar: Entity,
    missile: Entity,
) -> Result<ImpactEstimate, ImpactError> {
    if world.get::<&Missile>(missile).is_err() {
        return Err(ImpactError::MissileAbsent);
    }
    let table = world
        .get::<&DetectionTable>(radar)
        .map_err(|_| ImpactError::MissileAbsent)?;
    let record = table.get(missile).ok_or(ImpactError::MissileAbsent)?;
    calculate_impact_point(&record.position, &record.velocity)
}
