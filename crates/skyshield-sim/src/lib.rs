//! Simulation engine for SKYSHIELD.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces SimSnapshots for observers.

pub mod engagement;
pub mod engine;
pub mod environment;
pub mod guidance;
pub mod notify;
pub mod scenario;
pub mod systems;
pub mod tracking;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use environment::{Environment, FlatGround};
pub use notify::{NotificationSink, RecordingSink, TracingSink};
pub use skyshield_core as core;

/// Stable `u64` id for an entity handle, as used in events and snapshots.
pub fn entity_id(entity: hecs::Entity) -> u64 {
    entity.to_bits().get()
}

#[cfg(test)]
mod tests;
