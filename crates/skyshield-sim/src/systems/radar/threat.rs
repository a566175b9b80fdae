//! Threat scoring.

use skyshield_core::config::RadarConfig;
use skyshield_core::constants::THREAT_SPEED_NORMALIZER;
use skyshield_core::types::{Position, Velocity};

/// Composite threat score in [0, 1]: closer, faster, lower, and heading at
/// the radar all raise it.
pub fn threat_level(
    radar: &Position,
    position: &Position,
    velocity: &Velocity,
    distance: f64,
    config: &RadarConfig,
) -> f64 {
    let weights = &config.weights;

    let distance_factor = (1.0 - distance / config.scan_radius).clamp(0.0, 1.0);
    let speed_factor = (velocity.speed() / THREAT_SPEED_NORMALIZER).clamp(0.0, 1.0);
    let height_factor = (1.0 - position.z / config.max_detection_height).clamp(0.0, 1.0);

    // Zero vectors normalize to zero, so a stationary missile or one sitting
    // on the radar contributes nothing here.
    let to_radar = (radar.as_dvec3() - position.as_dvec3()).normalize_or_zero();
    let direction_factor = velocity.direction().dot(to_radar).clamp(0.0, 1.0);

    let score = distance_factor * weights.distance
        + speed_factor * weights.speed
        + height_factor * weights.height
        + direction_factor * weights.direction;
    score.clamp(0.0, 1.0)
}
