//! Simulation constants and default tuning parameters.
//!
//! Distances are world units (1 unit = 1 cm), times are seconds,
//! angles are degrees.

/// Default simulation tick rate (Hz).
pub const DEFAULT_TICK_RATE: f64 = 60.0;

/// Default RNG seed for scenario spawning.
pub const DEFAULT_SEED: u64 = 42;

// --- Missile flight ---

/// Altitude at which a missile leaves the vertical climb.
pub const MISSILE_TARGET_HEIGHT: f64 = 20_000.0;

/// Cruise altitude forced onto the horizontal end point.
pub const MISSILE_HORIZONTAL_HEIGHT: f64 = 17_000.0;

/// Length of the horizontal cruise leg.
pub const MISSILE_HORIZONTAL_DISTANCE: f64 = 5_000.0;

/// Constant missile speed (units/s).
pub const MISSILE_SPEED: f64 = 1_500.0;

/// Orientation smoothing rate (per second).
pub const MISSILE_ROTATION_SPEED: f64 = 2.0;

/// Duration of the vertical-to-bearing turn.
pub const MISSILE_TRANSITION_TIME: f64 = 1.0;

/// Radius of the area query performed when a missile explodes.
pub const MISSILE_EXPLOSION_RADIUS: f64 = 3_000.0;

/// Distance to the horizontal end point that triggers the descent (1 m).
pub const HORIZONTAL_ARRIVAL_RADIUS: f64 = 100.0;

/// Length of the forward collision probe during descent (1 m).
pub const COLLISION_PROBE_LENGTH: f64 = 100.0;

/// Pitch held while climbing (nose down relative to the reversed mesh axis).
pub const ASCENT_PITCH_DEG: f64 = -90.0;

/// Pitch correction applied to the velocity bearing (mesh forward axis is reversed).
pub const MESH_PITCH_CORRECTION_DEG: f64 = 180.0;

// --- Radar ---

/// Maximum horizontal detection range.
pub const RADAR_SCAN_RADIUS: f64 = 25_000.0;

/// Sweep rate (degrees per second).
pub const RADAR_SCAN_SPEED: f64 = 300.0;

/// Seconds between scan passes.
pub const RADAR_SCAN_INTERVAL: f64 = 0.05;

/// Full angular width of the scan sector (degrees).
pub const RADAR_SCAN_SECTOR_WIDTH: f64 = 20.0;

/// Lower edge of the detection height band.
pub const RADAR_MIN_DETECTION_HEIGHT: f64 = 1_000.0;

/// Upper edge of the detection height band.
pub const RADAR_MAX_DETECTION_HEIGHT: f64 = 25_000.0;

/// Look-ahead used for linear trajectory prediction (seconds).
pub const RADAR_PREDICTION_TIME: f64 = 2.0;

/// Default threat weights.
pub const THREAT_DISTANCE_WEIGHT: f64 = 0.4;
pub const THREAT_SPEED_WEIGHT: f64 = 0.3;
pub const THREAT_HEIGHT_WEIGHT: f64 = 0.3;
pub const THREAT_DIRECTION_WEIGHT: f64 = 0.2;

/// Speed at which the speed threat factor saturates (units/s).
pub const THREAT_SPEED_NORMALIZER: f64 = 2_000.0;

/// Records not re-detected for longer than this are dropped (seconds).
pub const DETECTION_STALE_SECS: f64 = 5.0;

/// Saturation value of a record's detection count.
pub const MAX_DETECTION_COUNT: u32 = 4;

/// Detection count required before a missile may be engaged.
pub const ENGAGEMENT_DETECTION_COUNT: u32 = 3;

/// Number of highest-threat records summarized after each scan.
pub const TOP_THREATS_REPORTED: usize = 3;

/// Vertical speed below which a missile is treated as falling fast (units/s).
pub const FALLING_FAST_VZ: f64 = -100.0;

/// Velocities with squared magnitude under this are treated as stationary.
pub const MIN_TRACKABLE_SPEED_SQ: f64 = 1.0;

// --- Time-to-impact model ---

/// Nominal downward acceleration of the impact model (units/s²).
pub const IMPACT_GRAVITY: f64 = 1_500.0;

/// Speed-dependent drag term applied to the impact model's gravity.
pub const IMPACT_DRAG_COEFFICIENT: f64 = 0.1;

/// Speed scale of the drag term: gravity grows by `IMPACT_DRAG_COEFFICIENT`
/// per this many units/s.
pub const IMPACT_DRAG_SPEED_SCALE: f64 = 1_000.0;

/// Divisor turning climb rate into remaining climb time.
pub const ASCENT_RATE_DIVISOR: f64 = 1_500.0;

/// Allowance for the cruise leg of a climbing missile (seconds).
pub const ASCENT_CRUISE_ALLOWANCE_SECS: f64 = 2.0;

/// Altitude above which the extra high-altitude allowance applies.
pub const HIGH_ALTITUDE_THRESHOLD: f64 = 15_000.0;

/// Extra allowance for missiles above `HIGH_ALTITUDE_THRESHOLD` (seconds).
pub const HIGH_ALTITUDE_ALLOWANCE_SECS: f64 = 5.0;

/// Minimum |vz| for the on-demand impact point query.
pub const MIN_IMPACT_VERTICAL_SPEED: f64 = 0.1;

// --- AA battery and interceptors ---

/// Seconds between interceptor launches.
pub const BATTERY_FIRE_INTERVAL: f64 = 2.0;

/// Interceptor speed (units/s).
pub const INTERCEPTOR_SPEED: f64 = 3_000.0;

/// Straight boost leg before homing begins (20 m).
pub const INTERCEPTOR_FORWARD_DISTANCE: f64 = 2_000.0;

/// Distance to the assigned target that counts as a direct hit (2 m).
pub const INTERCEPTOR_HIT_RADIUS: f64 = 200.0;

/// Distance to any missile that triggers proximity detonation (3 m).
pub const INTERCEPTOR_SWEEP_RADIUS: f64 = 300.0;

// --- Scenario ---

/// Half extent of the square map whose edges missiles launch from.
pub const MAP_HALF_SIZE: f64 = 30_000.0;

/// Missiles per salvo.
pub const SALVO_MISSILE_COUNT: usize = 3;

/// Launch altitude for spawned missiles.
pub const LAUNCH_HEIGHT: f64 = 100.0;

/// Horizontal range from the origin beyond which flying entities are removed.
pub const WORLD_RADIUS: f64 = 100_000.0;

// --- Notifications ---

/// Display durations (seconds) handed to the notification sink.
pub const SIGHTING_DISPLAY_SECS: f64 = 3.0;
pub const TRAJECTORY_DISPLAY_SECS: f64 = 10.0;
pub const THREAT_SUMMARY_DISPLAY_SECS: f64 = 0.1;
pub const ENGAGEMENT_DISPLAY_SECS: f64 = 2.0;
pub const DIAGNOSTIC_DISPLAY_SECS: f64 = 1.0;
