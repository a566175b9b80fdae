//! World geometry used for missile ground-impact probes.

use skyshield_core::types::Position;

/// Static geometry a missile can collide with.
pub trait Environment {
    /// True if the segment from `start` to `end` touches geometry.
    fn probe(&self, start: &Position, end: &Position) -> bool;
}

/// Infinite horizontal ground plane at `height`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatGround {
    pub height: f64,
}

impl Environment for FlatGround {
    fn probe(&self, start: &Position, end: &Position) -> bool {
        start.z.min(end.z) <= self.height
    }
}
