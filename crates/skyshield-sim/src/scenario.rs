//! Edge-of-map salvo spawner.
//!
//! Missiles launch from a random point on one of the four edges of a square
//! map centred on the origin. All randomness comes from the engine's seeded
//! RNG, so a salvo is reproducible from the config seed.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skyshield_core::config::{FlightConfig, ScenarioConfig};
use skyshield_core::types::Position;

use crate::world_setup::spawn_missile;

/// Map edge a missile launches from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    North,
    South,
    East,
    West,
}

impl Edge {
    fn from_index(i: u8) -> Self {
        match i {
            0 => Edge::North,
            1 => Edge::South,
            2 => Edge::East,
            _ => Edge::West,
        }
    }
}

/// Random launch point on a random edge, at `config.launch_height`.
pub fn random_edge_position(rng: &mut ChaCha8Rng, config: &ScenarioConfig) -> Position {
    let half = config.map_half_size;
    let edge = Edge::from_index(rng.gen_range(0..4));
    let along = rng.gen_range(-half..=half);
    let (x, y) = match edge {
        Edge::North => (along, half),
        Edge::South => (along, -half),
        Edge::East => (half, along),
        Edge::West => (-half, along),
    };
    Position::new(x, y, config.launch_height)
}

/// Launch `config.missile_count` missiles from random edge points, all bound
/// for the flight target point.
pub fn spawn_salvo(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    scenario: &ScenarioConfig,
    flight: &FlightConfig,
) -> Vec<Entity> {
    (0..scenario.missile_count)
        .map(|_| {
            let from = random_edge_position(rng, scenario);
            tracing::debug!(x = from.x, y = from.y, "salvo missile launched");
            spawn_missile(world, from, flight.target_point, flight)
        })
        .collect()
}
