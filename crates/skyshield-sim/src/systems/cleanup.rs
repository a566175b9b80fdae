//! Cleanup system: removes flying entities that left the world and flushes
//! the despawn buffer.

use hecs::{Entity, World};

use skyshield_core::components::{Interceptor, Missile};
use skyshield_core::types::Position;

use crate::entity_id;

/// Despawn missiles and interceptors beyond `world_radius` (horizontal range
/// from the origin), plus anything already queued in `despawn_buffer`.
/// Despawning a dead handle is a no-op.
pub fn run(world: &mut World, world_radius: f64, despawn_buffer: &mut Vec<Entity>) {
    let radius_sq = world_radius * world_radius;
    let out_of_bounds = |pos: &Position| pos.x * pos.x + pos.y * pos.y > radius_sq;

    for (entity, (pos, _missile)) in world.query_mut::<(&Position, &Missile)>() {
        if out_of_bounds(pos) {
            despawn_buffer.push(entity);
        }
    }

    for (entity, (pos, _interceptor)) in world.query_mut::<(&Position, &Interceptor)>() {
        if out_of_bounds(pos) {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        if world.despawn(entity).is_ok() {
            tracing::trace!(entity = entity_id(entity), "despawned");
        }
    }
}
