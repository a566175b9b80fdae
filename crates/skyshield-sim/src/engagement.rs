//! Components that link entities to each other.
//!
//! They live here rather than in `skyshield-core` because they hold
//! `hecs::Entity` handles. A handle whose entity has been despawned simply
//! fails lookup, so a link never needs to be cleared on the other side.

use hecs::Entity;

/// The missile an interceptor was launched at.
#[derive(Debug, Clone, Copy)]
pub struct Engagement {
    pub target: Option<Entity>,
}

/// The radar an AA battery draws targets from. Resolved automatically to
/// the first radar in the world when unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct RadarLink {
    pub radar: Option<Entity>,
}
