//! Steering math shared by missiles and interceptors.
//!
//! Provides the smoothed climb-to-bearing blend, pure pursuit, the horizontal
//! leg end point, and single-step predicted intercept. Every helper takes a
//! fallback direction so degenerate geometry never produces NaN.

use glam::DVec3;

use skyshield_core::types::{safe_normalize, Position, Velocity};

/// Hermite smoothstep: 0 below `edge0`, 1 at or above `edge1`.
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    if x < edge0 {
        return 0.0;
    }
    if x >= edge1 {
        return 1.0;
    }
    let t = (x - edge0) / (edge1 - edge0);
    t * t * (3.0 - 2.0 * t)
}

/// Direction partway through the climb-to-bearing turn.
///
/// Linearly blends vertical into `target_direction` by `alpha` and
/// renormalizes so the caller can hold speed constant. When the blend cancels
/// out (target straight down at alpha = 0.5) `fallback` is returned.
pub fn blend_direction(target_direction: DVec3, alpha: f64, fallback: DVec3) -> DVec3 {
    safe_normalize(DVec3::Z.lerp(target_direction, alpha), fallback)
}

/// Velocity of magnitude `speed` pointing from `from` at `to`.
pub fn pure_pursuit(from: &Position, to: &Position, speed: f64, fallback: DVec3) -> Velocity {
    Velocity::along(from.direction_to(to, fallback), speed)
}

/// End of the horizontal cruise leg: `distance` along the bearing from
/// `start` to `target`, with altitude forced to `cruise_height`.
pub fn horizontal_end_point(
    start: &Position,
    target: &Position,
    distance: f64,
    cruise_height: f64,
    fallback: DVec3,
) -> Position {
    let direction = start.direction_to(target, fallback);
    let mut end = Position::from(start.as_dvec3() + direction * distance);
    end.z = cruise_height;
    end
}

/// Where the target will be after the time an interceptor at `own_pos`
/// flying at `speed` needs to cover the current range.
pub fn predict_intercept_point(
    target_pos: &Position,
    target_vel: &Velocity,
    own_pos: &Position,
    speed: f64,
) -> Position {
    let time_to_target = own_pos.range_to(target_pos) / speed;
    target_pos.advanced(target_vel, time_to_target)
}
