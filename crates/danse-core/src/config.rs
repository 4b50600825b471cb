//! Session configuration.
//!
//! Every field has a default, so a JSON file only needs to name the values
//! it overrides. `validate` is called by the loaders; hand-built configs
//! should call it before starting an engine.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bounds::Bounds;
use crate::constants::*;
use crate::curve::ResponseCurve;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bounds: x [{min_x}, {max_x}], z [{min_z}, {max_z}]")]
    InvalidBounds {
        min_x: f32,
        max_x: f32,
        min_z: f32,
        max_z: f32,
    },
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("invalid response curve: {0}")]
    InvalidCurve(String),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Complete configuration for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed. Same seed and inputs = same session.
    pub seed: u64,
    pub bounds: Bounds,
    pub leader: LeaderConfig,
    pub follower: FollowerConfig,
    pub physics: PhysicsConfig,
}

/// Leader movement and charge tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderConfig {
    pub move_speed: f32,
    pub detached_speed_multiplier: f32,
    pub bounds_margin: f32,
    pub turn_rate: f32,
    pub charge_max_time: f32,
    pub min_eject_distance: f32,
    pub max_eject_distance: f32,
    pub eject_cooldown: f32,
    pub response_curve: ResponseCurve,
}

/// Follower orbit, ejection and return tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerConfig {
    pub orbit_radius: f32,
    pub orbit_angular_speed: f32,
    pub orbit_smooth_time: f32,
    pub orbit_max_speed: f32,
    pub orbit_turn_rate: f32,
    pub landing_safety_margin: f32,
    pub eject_impulse_enabled: bool,
    pub force_per_unit_distance: f32,
    pub min_eject_impulse: f32,
    pub max_eject_impulse: f32,
    pub landing_reach_threshold: f32,
    pub travel_speed_per_unit_distance: f32,
    pub min_travel_speed: f32,
    pub travel_speed_boost_factor: f32,
    pub travel_turn_rate: f32,
    pub base_return_speed: f32,
    pub return_accel: f32,
    pub max_return_speed: f32,
    pub return_coast_rate: f32,
    pub attach_distance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub ground_height: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            bounds: Bounds::default(),
            leader: LeaderConfig::default(),
            follower: FollowerConfig::default(),
            physics: PhysicsConfig::default(),
        }
    }
}

impl Default for LeaderConfig {
    fn default() -> Self {
        Self {
            move_speed: LEADER_MOVE_SPEED,
            detached_speed_multiplier: LEADER_DETACHED_SPEED_MULTIPLIER,
            bounds_margin: LEADER_BOUNDS_MARGIN,
            turn_rate: LEADER_TURN_RATE,
            charge_max_time: CHARGE_MAX_TIME,
            min_eject_distance: MIN_EJECT_DISTANCE,
            max_eject_distance: MAX_EJECT_DISTANCE,
            eject_cooldown: EJECT_COOLDOWN,
            response_curve: ResponseCurve::Linear,
        }
    }
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            orbit_radius: ORBIT_RADIUS,
            orbit_angular_speed: ORBIT_ANGULAR_SPEED,
            orbit_smooth_time: ORBIT_SMOOTH_TIME,
            orbit_max_speed: ORBIT_SMOOTH_MAX_SPEED,
            orbit_turn_rate: ORBIT_TURN_RATE,
            landing_safety_margin: LANDING_SAFETY_MARGIN,
            eject_impulse_enabled: true,
            force_per_unit_distance: FORCE_PER_UNIT_DISTANCE,
            min_eject_impulse: MIN_EJECT_IMPULSE,
            max_eject_impulse: MAX_EJECT_IMPULSE,
            landing_reach_threshold: LANDING_REACH_THRESHOLD,
            travel_speed_per_unit_distance: TRAVEL_SPEED_PER_UNIT_DISTANCE,
            min_travel_speed: MIN_TRAVEL_SPEED,
            travel_speed_boost_factor: TRAVEL_SPEED_BOOST_FACTOR,
            travel_turn_rate: TRAVEL_TURN_RATE,
            base_return_speed: BASE_RETURN_SPEED,
            return_accel: RETURN_ACCEL,
            max_return_speed: MAX_RETURN_SPEED,
            return_coast_rate: RETURN_COAST_RATE,
            attach_distance: ATTACH_DISTANCE,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            ground_height: GROUND_HEIGHT,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bounds.validate()?;
        self.leader.validate()?;
        self.follower.validate()?;
        self.physics.validate()
    }
}

impl LeaderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("leader.move_speed", self.move_speed)?;
        positive("leader.detached_speed_multiplier", self.detached_speed_multiplier)?;
        non_negative("leader.bounds_margin", self.bounds_margin)?;
        positive("leader.turn_rate", self.turn_rate)?;
        positive("leader.charge_max_time", self.charge_max_time)?;
        non_negative("leader.min_eject_distance", self.min_eject_distance)?;
        ordered(
            "leader.max_eject_distance",
            self.min_eject_distance,
            self.max_eject_distance,
        )?;
        non_negative("leader.eject_cooldown", self.eject_cooldown)?;
        self.response_curve.validate()
    }
}

impl FollowerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("follower.orbit_radius", self.orbit_radius)?;
        finite("follower.orbit_angular_speed", self.orbit_angular_speed)?;
        positive("follower.orbit_smooth_time", self.orbit_smooth_time)?;
        positive("follower.orbit_max_speed", self.orbit_max_speed)?;
        positive("follower.orbit_turn_rate", self.orbit_turn_rate)?;
        non_negative("follower.landing_safety_margin", self.landing_safety_margin)?;
        non_negative("follower.force_per_unit_distance", self.force_per_unit_distance)?;
        non_negative("follower.min_eject_impulse", self.min_eject_impulse)?;
        ordered(
            "follower.max_eject_impulse",
            self.min_eject_impulse,
            self.max_eject_impulse,
        )?;
        positive("follower.landing_reach_threshold", self.landing_reach_threshold)?;
        positive(
            "follower.travel_speed_per_unit_distance",
            self.travel_speed_per_unit_distance,
        )?;
        positive("follower.min_travel_speed", self.min_travel_speed)?;
        positive("follower.travel_speed_boost_factor", self.travel_speed_boost_factor)?;
        ordered(
            "follower.max_return_speed * travel_speed_boost_factor",
            self.min_travel_speed,
            self.max_return_speed * self.travel_speed_boost_factor,
        )?;
        positive("follower.travel_turn_rate", self.travel_turn_rate)?;
        non_negative("follower.base_return_speed", self.base_return_speed)?;
        ordered(
            "follower.max_return_speed",
            self.base_return_speed,
            self.max_return_speed,
        )?;
        non_negative("follower.return_accel", self.return_accel)?;
        non_negative("follower.return_coast_rate", self.return_coast_rate)?;
        non_negative("follower.attach_distance", self.attach_distance)
    }

    /// Margin for clamping landing targets inside the play area. Shared by
    /// the leader's preview and the follower's eject-time clamp.
    pub fn landing_margin(&self) -> f32 {
        self.orbit_radius + self.landing_safety_margin
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("physics.gravity", self.gravity)?;
        finite("physics.ground_height", self.ground_height)
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must be finite, got {value}"),
        })
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must be positive, got {value}"),
        })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must not be negative, got {value}"),
        })
    }
}

/// `max` must be finite and not below `min`.
fn ordered(name: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    finite(name, max)?;
    if max >= min {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must be at least {min}, got {max}"),
        })
    }
}
