//! Simulation constants and default tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 50;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

/// Horizontal distance below which a direction is considered degenerate.
pub const DIRECTION_EPSILON: f32 = 1e-3;

/// Analog input threshold above which a button counts as held.
pub const ANALOG_DEADZONE: f32 = 0.1;

// --- Play area ---

pub const DEFAULT_MIN_X: f32 = -10.0;
pub const DEFAULT_MAX_X: f32 = 10.0;
pub const DEFAULT_MIN_Z: f32 = -8.0;
pub const DEFAULT_MAX_Z: f32 = 8.0;

// --- Physics ---

/// Downward acceleration applied to non-kinematic bodies (m/s²).
pub const GRAVITY: f32 = 9.81;

/// Height of the floor plane.
pub const GROUND_HEIGHT: f32 = 0.0;

// --- Leader movement ---

/// Leader walking speed (m/s).
pub const LEADER_MOVE_SPEED: f32 = 3.0;

/// Leader speed multiplier while the follower is away (Ejected or Detached).
pub const LEADER_DETACHED_SPEED_MULTIPLIER: f32 = 1.6;

/// Margin keeping the leader's body inside the play area.
pub const LEADER_BOUNDS_MARGIN: f32 = 0.3;

/// Leader turn rate toward its movement direction (slerp factor per second).
pub const LEADER_TURN_RATE: f32 = 10.0;

// --- Charge / targeting ---

/// Hold time at which charge saturates (seconds).
pub const CHARGE_MAX_TIME: f32 = 1.2;

/// Eject distance at zero charge.
pub const MIN_EJECT_DISTANCE: f32 = 2.0;

/// Eject distance at full charge.
pub const MAX_EJECT_DISTANCE: f32 = 6.0;

/// Extra clearance added to the orbit radius when clamping landing points.
pub const LANDING_SAFETY_MARGIN: f32 = 0.25;

/// Minimum time between two ejections (seconds).
pub const EJECT_COOLDOWN: f32 = 0.25;

// --- Orbit ---

/// Horizontal follower-to-leader distance while orbiting.
pub const ORBIT_RADIUS: f32 = 1.2;

/// Orbit angular speed (rad/s).
pub const ORBIT_ANGULAR_SPEED: f32 = 2.2;

/// Smooth time of the critically damped orbit follow (seconds).
pub const ORBIT_SMOOTH_TIME: f32 = 0.08;

/// Speed cap of the orbit follow (m/s).
pub const ORBIT_SMOOTH_MAX_SPEED: f32 = 100.0;

/// Turn rate toward the leader while orbiting.
pub const ORBIT_TURN_RATE: f32 = 10.0;

// --- Ejection ---

/// Impulse per metre of requested eject distance.
pub const FORCE_PER_UNIT_DISTANCE: f32 = 2.0;

pub const MIN_EJECT_IMPULSE: f32 = 4.0;
pub const MAX_EJECT_IMPULSE: f32 = 14.0;

/// Horizontal distance at which an ejected follower counts as landed.
pub const LANDING_REACH_THRESHOLD: f32 = 0.1;

/// Travel speed per metre of remaining distance while ejected.
pub const TRAVEL_SPEED_PER_UNIT_DISTANCE: f32 = 3.0;

pub const MIN_TRAVEL_SPEED: f32 = 1.5;

/// Upper travel speed is `MAX_RETURN_SPEED * TRAVEL_SPEED_BOOST_FACTOR`.
pub const TRAVEL_SPEED_BOOST_FACTOR: f32 = 1.5;

// --- Return ---

pub const BASE_RETURN_SPEED: f32 = 2.5;

/// Return acceleration while the accelerate input is held (m/s²).
pub const RETURN_ACCEL: f32 = 6.0;

pub const MAX_RETURN_SPEED: f32 = 8.0;

/// Rate at which return speed drifts back to cruise with no input (m/s²).
pub const RETURN_COAST_RATE: f32 = 2.0;

/// Horizontal distance to the leader at which a detached follower re-attaches.
pub const ATTACH_DISTANCE: f32 = 1.5;

/// Turn rate toward the travel direction while ejected or detached.
pub const TRAVEL_TURN_RATE: f32 = 8.0;
