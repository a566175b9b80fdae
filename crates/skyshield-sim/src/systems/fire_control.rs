//! Fire control system: target selection and interceptor launches.
//!
//! Each AA battery counts down its cooldown, resolves its radar, picks the
//! nearest missile the radar has confirmed, and launches an interceptor at
//! it. In manual fire mode a pending `Fire` request is also required.

use glam::DVec3;
use hecs::{Entity, World};

use skyshield_core::components::{AaBattery, AaSite, Missile, RadarSite};
use skyshield_core::config::{BatteryConfig, InterceptorConfig};
use skyshield_core::constants::ENGAGEMENT_DETECTION_COUNT;
use skyshield_core::enums::{AlertLevel, AudioCue, FireMode};
use skyshield_core::events::{AudioEvent, SimEvent};
use skyshield_core::state::ScoreView;
use skyshield_core::types::Position;

use crate::engagement::RadarLink;
use crate::entity_id;
use crate::systems::radar::missiles_detected_at_least;
use crate::world_setup::spawn_interceptor;

/// Run fire control for every battery.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    battery_config: &BatteryConfig,
    interceptor_config: &InterceptorConfig,
    fire_mode: FireMode,
    dt: f64,
    events: &mut Vec<SimEvent>,
    audio_events: &mut Vec<AudioEvent>,
    score: &mut ScoreView,
) {
    let batteries: Vec<(Entity, Position)> = world
        .query::<(&AaSite, &Position)>()
        .iter()
        .map(|(e, (_, pos))| (e, *pos))
        .collect();

    for (battery, own_pos) in batteries {
        let ready = match world.get::<&mut AaBattery>(battery) {
            Ok(mut state) => {
                state.since_last_fire += dt;
                state.since_last_fire >= battery_config.fire_interval
            }
            Err(_) => continue,
        };
        if !ready {
            tracing::trace!(battery = entity_id(battery), "waiting for cooldown");
            continue;
        }

        let Some(radar) = resolve_radar(world, battery, events) else {
            continue;
        };

        let Some((target, target_pos)) = select_target(world, radar, &own_pos) else {
            tracing::trace!(battery = entity_id(battery), "no confirmed target");
            continue;
        };

        if fire_mode == FireMode::Manual {
            let requested = world
                .get::<&AaBattery>(battery)
                .map(|s| s.fire_requested)
                .unwrap_or(false);
            if !requested {
                continue;
            }
        }

        let heading = own_pos.direction_to(&target_pos, DVec3::Z);
        let interceptor = spawn_interceptor(world, own_pos, heading, target, interceptor_config);

        if let Ok(mut state) = world.get::<&mut AaBattery>(battery) {
            state.since_last_fire = 0.0;
            state.fire_requested = false;
            state.rounds_fired += 1;
        }
        score.interceptors_fired += 1;

        tracing::info!(
            battery = entity_id(battery),
            interceptor = entity_id(interceptor),
            target = entity_id(target),
            "interceptor launched"
        );
        events.push(SimEvent::InterceptorLaunched {
            interceptor_id: entity_id(interceptor),
            target_id: entity_id(target),
            position: own_pos,
        });
        audio_events.push(AudioEvent {
            cue: AudioCue::Launch,
            position: own_pos,
        });
    }
}

/// The battery's radar, linking the first radar in the world if the link is
/// unset or dead.
fn resolve_radar(world: &World, battery: Entity, events: &mut Vec<SimEvent>) -> Option<Entity> {
    let linked = world.get::<&RadarLink>(battery).ok().and_then(|l| l.radar);
    if let Some(radar) = linked.filter(|&r| world.get::<&RadarSite>(r).is_ok()) {
        return Some(radar);
    }

    let found = world
        .query::<&RadarSite>()
        .iter()
        .map(|(e, _)| e)
        .next();

    match found {
        Some(radar) => {
            if let Ok(mut link) = world.get::<&mut RadarLink>(battery) {
                link.radar = Some(radar);
            }
            tracing::info!(
                battery = entity_id(battery),
                radar = entity_id(radar),
                "radar linked automatically"
            );
            events.push(SimEvent::diagnostic(
                AlertLevel::Info,
                "AA: radar found automatically",
            ));
            Some(radar)
        }
        None => {
            tracing::warn!(battery = entity_id(battery), "no radar on the map");
            events.push(SimEvent::diagnostic(
                AlertLevel::Critical,
                "AA: no radar on the map",
            ));
            None
        }
    }
}

/// Nearest live missile that `radar` has seen at least three times.
///
/// Distance is measured from `own_pos` to the missile's live position.
/// Ties go to the first entry in table order.
pub fn select_target(world: &World, radar: Entity, own_pos: &Position) -> Option<(Entity, Position)> {
    missiles_detected_at_least(world, radar, ENGAGEMENT_DETECTION_COUNT)
        .into_iter()
        .filter_map(|missile| {
            world.get::<&Missile>(missile).ok()?;
            let pos = *world.get::<&Position>(missile).ok()?;
            Some((missile, pos))
        })
        .min_by(|a, b| own_pos.range_to(&a.1).total_cmp(&own_pos.range_to(&b.1)))
}
