//! Fundamental geometric and simulation types.
//!
//! World units are centimeters (1 unit = 1 cm). x and y span the ground
//! plane, z is up (altitude). Angles are in degrees.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 3D position in world space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// 3D velocity in world units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Orientation in degrees (pitch about the lateral axis, yaw about z, roll).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

/// Normalize `v`, returning `fallback` when `v` is zero-length or not finite.
pub fn safe_normalize(v: DVec3, fallback: DVec3) -> DVec3 {
    v.try_normalize().unwrap_or(fallback)
}

/// Wrap an angle in degrees into (-180, 180].
pub fn wrap_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}

impl Position {
    pub const ORIGIN: Position = Position {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn as_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Straight-line distance to another position.
    pub fn range_to(&self, other: &Position) -> f64 {
        self.as_dvec3().distance(other.as_dvec3())
    }

    /// Horizontal range (ignoring altitude).
    pub fn horizontal_range_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Bearing to another position projected on the ground plane,
    /// counter-clockwise from +x, in [0, 360).
    pub fn bearing_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dy.atan2(dx).to_degrees().rem_euclid(360.0)
    }

    /// Unit direction toward `other`, or `fallback` if the points coincide.
    pub fn direction_to(&self, other: &Position, fallback: DVec3) -> DVec3 {
        safe_normalize(other.as_dvec3() - self.as_dvec3(), fallback)
    }

    /// Position after travelling along `velocity` for `secs`.
    pub fn advanced(&self, velocity: &Velocity, secs: f64) -> Position {
        Position::from(self.as_dvec3() + velocity.as_dvec3() * secs)
    }

    /// True if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.as_dvec3().is_finite()
    }
}

impl From<DVec3> for Position {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl Velocity {
    pub const ZERO: Velocity = Velocity {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Velocity of magnitude `speed` along `direction` (assumed unit length).
    pub fn along(direction: DVec3, speed: f64) -> Self {
        Self::from(direction * speed)
    }

    pub fn as_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Speed magnitude.
    pub fn speed(&self) -> f64 {
        self.as_dvec3().length()
    }

    /// Unit direction of travel, zero when stationary.
    pub fn direction(&self) -> DVec3 {
        self.as_dvec3().normalize_or_zero()
    }
}

impl From<DVec3> for Velocity {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl Rotation {
    pub fn new(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Rotation whose forward axis points along `direction`. Roll is always zero.
    pub fn from_direction(direction: DVec3) -> Self {
        let horizontal = (direction.x * direction.x + direction.y * direction.y).sqrt();
        Self {
            pitch: direction.z.atan2(horizontal).to_degrees(),
            yaw: direction.y.atan2(direction.x).to_degrees(),
            roll: 0.0,
        }
    }

    /// Every axis wrapped into (-180, 180].
    pub fn normalized(self) -> Self {
        Self {
            pitch: wrap_degrees(self.pitch),
            yaw: wrap_degrees(self.yaw),
            roll: wrap_degrees(self.roll),
        }
    }

    /// Componentwise sum, normalized.
    pub fn combined(self, other: Rotation) -> Self {
        Self::new(
            self.pitch + other.pitch,
            self.yaw + other.yaw,
            self.roll + other.roll,
        )
        .normalized()
    }

    /// Move toward `target` along the shortest arc on each axis, covering
    /// `clamp(dt * rate, 0, 1)` of the remaining difference.
    pub fn interp_to(self, target: Rotation, dt: f64, rate: f64) -> Self {
        let delta = Self::new(
            target.pitch - self.pitch,
            target.yaw - self.yaw,
            target.roll - self.roll,
        )
        .normalized();
        let step = (dt * rate).clamp(0.0, 1.0);
        Self::new(
            self.pitch + delta.pitch * step,
            self.yaw + delta.yaw * step,
            self.roll + delta.roll * step,
        )
        .normalized()
    }
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}
