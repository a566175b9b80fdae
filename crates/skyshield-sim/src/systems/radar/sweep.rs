//! Sector sweep geometry.
//!
//! The beam is a vertical wedge `scan_sector_width` degrees wide centred on
//! `scan_angle`, bounded by `scan_radius` horizontally and by the detection
//! height band vertically.

use skyshield_core::config::RadarConfig;
use skyshield_core::types::{wrap_degrees, Position};

/// Sweep angle after `dt` seconds, wrapped into [0, 360).
pub fn advance_sweep(scan_angle: f64, scan_speed: f64, dt: f64) -> f64 {
    (scan_angle + scan_speed * dt).rem_euclid(360.0)
}

/// Signed shortest difference `a - b` in degrees, in (-180, 180].
pub fn angular_difference(a: f64, b: f64) -> f64 {
    wrap_degrees(a - b)
}

/// True if `bearing` lies within half the sector width of `scan_angle`.
pub fn in_sector(bearing: f64, scan_angle: f64, sector_width: f64) -> bool {
    angular_difference(bearing, scan_angle).abs() <= sector_width * 0.5
}

pub fn in_height_band(z: f64, config: &RadarConfig) -> bool {
    z >= config.min_detection_height && z <= config.max_detection_height
}

/// Full beam test for a missile at `target` seen from `radar`.
pub fn in_scan_volume(
    radar: &Position,
    target: &Position,
    scan_angle: f64,
    config: &RadarConfig,
) -> bool {
    if !in_height_band(target.z, config) {
        return false;
    }
    if radar.horizontal_range_to(target) > config.scan_radius {
        return false;
    }
    in_sector(radar.bearing_to(target), scan_angle, config.scan_sector_width)
}
