//! Load-time configuration.
//!
//! Every section falls back to its defaults for missing fields, so a config
//! file only needs to name the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::FireMode;
use crate::error::ConfigError;
use crate::types::Position;

/// Complete simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for scenario spawning. Same seed = same simulation.
    pub seed: u64,
    /// Ticks per simulated second.
    pub tick_rate: f64,
    pub flight: FlightConfig,
    pub radar: RadarConfig,
    pub battery: BatteryConfig,
    pub interceptor: InterceptorConfig,
    pub scenario: ScenarioConfig,
}

/// Missile flight parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Altitude that ends the vertical climb.
    pub target_height: f64,
    /// Altitude forced onto the horizontal end point.
    pub horizontal_height: f64,
    /// Length of the horizontal leg.
    pub horizontal_distance: f64,
    pub speed: f64,
    /// Orientation smoothing rate.
    pub rotation_speed: f64,
    /// Duration of the vertical-to-bearing turn (seconds).
    pub transition_time: f64,
    pub explosion_radius: f64,
    /// Point every missile ultimately dives onto.
    pub target_point: Position,
}

/// Threat score weights. They need not sum to one; the score is clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatWeights {
    pub distance: f64,
    pub speed: f64,
    pub height: f64,
    pub direction: f64,
}

/// Radar sweep and tracking parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub scan_radius: f64,
    /// Degrees per second.
    pub scan_speed: f64,
    /// Seconds between scan passes.
    pub scan_interval: f64,
    /// Full sector width in degrees.
    pub scan_sector_width: f64,
    pub min_detection_height: f64,
    pub max_detection_height: f64,
    /// Look-ahead for trajectory prediction (seconds).
    pub prediction_time: f64,
    pub weights: ThreatWeights,
}

/// AA battery parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    /// Minimum seconds between launches.
    pub fire_interval: f64,
    pub fire_mode: FireMode,
}

/// Interceptor parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterceptorConfig {
    pub speed: f64,
    /// Boost leg length before homing.
    pub forward_distance: f64,
    pub hit_radius: f64,
    pub sweep_radius: f64,
}

/// Edge-of-map salvo parameters used by the scenario spawner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub map_half_size: f64,
    pub missile_count: usize,
    pub launch_height: f64,
    /// Missiles and interceptors beyond this horizontal range from the
    /// origin are removed.
    pub world_radius: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            tick_rate: DEFAULT_TICK_RATE,
            flight: FlightConfig::default(),
            radar: RadarConfig::default(),
            battery: BatteryConfig::default(),
            interceptor: InterceptorConfig::default(),
            scenario: ScenarioConfig::default(),
        }
    }
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            target_height: MISSILE_TARGET_HEIGHT,
            horizontal_height: MISSILE_HORIZONTAL_HEIGHT,
            horizontal_distance: MISSILE_HORIZONTAL_DISTANCE,
            speed: MISSILE_SPEED,
            rotation_speed: MISSILE_ROTATION_SPEED,
            transition_time: MISSILE_TRANSITION_TIME,
            explosion_radius: MISSILE_EXPLOSION_RADIUS,
            target_point: Position::ORIGIN,
        }
    }
}

impl Default for ThreatWeights {
    fn default() -> Self {
        Self {
            distance: THREAT_DISTANCE_WEIGHT,
            speed: THREAT_SPEED_WEIGHT,
            height: THREAT_HEIGHT_WEIGHT,
            direction: THREAT_DIRECTION_WEIGHT,
        }
    }
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            scan_radius: RADAR_SCAN_RADIUS,
            scan_speed: RADAR_SCAN_SPEED,
            scan_interval: RADAR_SCAN_INTERVAL,
            scan_sector_width: RADAR_SCAN_SECTOR_WIDTH,
            min_detection_height: RADAR_MIN_DETECTION_HEIGHT,
            max_detection_height: RADAR_MAX_DETECTION_HEIGHT,
            prediction_time: RADAR_PREDICTION_TIME,
            weights: ThreatWeights::default(),
        }
    }
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            fire_interval: BATTERY_FIRE_INTERVAL,
            fire_mode: FireMode::default(),
        }
    }
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            speed: INTERCEPTOR_SPEED,
            forward_distance: INTERCEPTOR_FORWARD_DISTANCE,
            hit_radius: INTERCEPTOR_HIT_RADIUS,
            sweep_radius: INTERCEPTOR_SWEEP_RADIUS,
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            map_half_size: MAP_HALF_SIZE,
            missile_count: SALVO_MISSILE_COUNT,
            launch_height: LAUNCH_HEIGHT,
            world_radius: WORLD_RADIUS,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Seconds per tick.
    pub fn dt(&self) -> f64 {
        1.0 / self.tick_rate
    }

    /// Reject values that would stall or destabilize the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tick_rate", self.tick_rate)?;

        let f = &self.flight;
        positive("flight.speed", f.speed)?;
        positive("flight.transition_time", f.transition_time)?;
        positive("flight.rotation_speed", f.rotation_speed)?;
        non_negative("flight.horizontal_distance", f.horizontal_distance)?;
        non_negative("flight.explosion_radius", f.explosion_radius)?;
        finite("flight.target_height", f.target_height)?;
        finite("flight.horizontal_height", f.horizontal_height)?;
        let step = f.speed * self.dt();
        if step >= 2.0 * HORIZONTAL_ARRIVAL_RADIUS {
            return Err(ConfigError::invalid(
                "flight.speed",
                format!(
                    "moves {step:.0} units per tick; the horizontal end point \
                     needs steps under {:.0}",
                    2.0 * HORIZONTAL_ARRIVAL_RADIUS
                ),
            ));
        }
        if !f.target_point.is_finite() {
            return Err(ConfigError::invalid(
                "flight.target_point",
                "coordinates must be finite",
            ));
        }

        let r = &self.radar;
        positive("radar.scan_radius", r.scan_radius)?;
        positive("radar.scan_interval", r.scan_interval)?;
        positive("radar.max_detection_height", r.max_detection_height)?;
        non_negative("radar.scan_speed", r.scan_speed)?;
        non_negative("radar.prediction_time", r.prediction_time)?;
        if !(r.scan_sector_width > 0.0 && r.scan_sector_width <= 360.0) {
            return Err(ConfigError::invalid(
                "radar.scan_sector_width",
                format!("must be in (0, 360], got {}", r.scan_sector_width),
            ));
        }
        if r.min_detection_height > r.max_detection_height {
            return Err(ConfigError::invalid(
                "radar.min_detection_height",
                format!(
                    "{} is above max_detection_height {}",
                    r.min_detection_height, r.max_detection_height
                ),
            ));
        }
        non_negative("radar.weights.distance", r.weights.distance)?;
        non_negative("radar.weights.speed", r.weights.speed)?;
        non_negative("radar.weights.height", r.weights.height)?;
        non_negative("radar.weights.direction", r.weights.direction)?;

        non_negative("battery.fire_interval", self.battery.fire_interval)?;

        let i = &self.interceptor;
        positive("interceptor.speed", i.speed)?;
        non_negative("interceptor.forward_distance", i.forward_distance)?;
        non_negative("interceptor.hit_radius", i.hit_radius)?;
        non_negative("interceptor.sweep_radius", i.sweep_radius)?;

        positive("scenario.map_half_size", self.scenario.map_half_size)?;
        finite("scenario.launch_height", self.scenario.launch_height)?;
        if self.scenario.world_radius <= self.scenario.map_half_size {
            return Err(ConfigError::invalid(
                "scenario.world_radius",
                format!(
                    "{} must exceed map_half_size {}",
                    self.scenario.world_radius, self.scenario.map_half_size
                ),
            ));
        }

        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be finite, got {value}")))
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be > 0, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be >= 0, got {value}")))
    }
}
