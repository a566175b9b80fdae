//! Trajectory extrapolation and time-to-impact estimates.

use skyshield_core::constants::*;
use skyshield_core::error::ImpactError;
use skyshield_core::types::{Position, Velocity};

/// Result of the on-demand impact point query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactEstimate {
    pub time_to_ground: f64,
    pub impact_point: Position,
}

/// Straight-line position `prediction_time` seconds ahead, cut short at the
/// ground for a missile falling fast enough to reach it sooner.
///
/// Returns `None` for an effectively stationary missile; callers keep their
/// previous prediction.
pub fn predict_position(
    position: &Position,
    velocity: &Velocity,
    prediction_time: f64,
) -> Option<Position> {
    if velocity.as_dvec3().length_squared() < MIN_TRACKABLE_SPEED_SQ {
        return None;
    }
    let mut predicted = position.advanced(velocity, prediction_time);
    if velocity.z < FALLING_FAST_VZ {
        let time_to_ground = -position.z / velocity.z;
        if time_to_ground > 0.0 && time_to_ground < prediction_time {
            predicted = position.advanced(velocity, time_to_ground);
            predicted.z = 0.0;
        }
    }
    Some(predicted)
}

/// Heuristic seconds until the missile reaches the ground.
///
/// A climbing or level missile gets a fixed allowance for the rest of its
/// profile. A descending one solves `0 = z + vz*t - g*t²/2` with a
/// speed-dependent effective gravity, falling back to the linear estimate
/// when the quadratic has no positive root.
pub fn time_to_impact(position: &Position, velocity: &Velocity) -> f64 {
    if position.z <= 0.0 {
        return 0.0;
    }

    if velocity.z >= 0.0 {
        let mut estimate = velocity.z / ASCENT_RATE_DIVISOR + ASCENT_CRUISE_ALLOWANCE_SECS;
        if position.z > HIGH_ALTITUDE_THRESHOLD {
            estimate += HIGH_ALTITUDE_ALLOWANCE_SECS;
        }
        return estimate;
    }

    let effective_gravity = IMPACT_GRAVITY
        * (1.0 + IMPACT_DRAG_COEFFICIENT * velocity.speed() / IMPACT_DRAG_SPEED_SCALE);
    let a = -0.5 * effective_gravity;
    let b = velocity.z;
    let c = position.z;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant >= 0.0 {
        let root = discriminant.sqrt();
        let t1 = (-b + root) / (2.0 * a);
        let t2 = (-b - root) / (2.0 * a);
        let t = if t1 > 0.0 { t1 } else { t2 };
        if t > 0.0 {
            return t;
        }
    }

    -position.z / velocity.z
}

/// Ground impact estimate along the current straight-line velocity.
pub fn calculate_impact_point(
    position: &Position,
    velocity: &Velocity,
) -> Result<ImpactEstimate, ImpactError> {
    if velocity.as_dvec3().length_squared() < MIN_TRACKABLE_SPEED_SQ {
        return Err(ImpactError::NotMoving);
    }
    if velocity.z.abs() <= MIN_IMPACT_VERTICAL_SPEED {
        return Err(ImpactError::InsufficientVerticalSpeed);
    }
    let time_to_ground = -position.z / velocity.z;
    if time_to_ground <= 0.0 {
        return Err(ImpactError::AlreadyDown);
    }
    Ok(ImpactEstimate {
        time_to_ground,
        impact_point: position.advanced(velocity, time_to_ground),
    })
}
