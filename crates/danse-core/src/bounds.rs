//! Rectangular play area and the clamp shared by both actors.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::constants::*;
use crate::types::Pose;

/// Play-area limits on the horizontal plane. Height is unbounded.
///
/// Invariant: `min_x < max_x` and `min_z < max_z`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_x: DEFAULT_MIN_X,
            max_x: DEFAULT_MAX_X,
            min_z: DEFAULT_MIN_Z,
            max_z: DEFAULT_MAX_Z,
        }
    }
}

impl Bounds {
    pub fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Result<Self, ConfigError> {
        let bounds = Self {
            min_x,
            max_x,
            min_z,
            max_z,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [self.min_x, self.max_x, self.min_z, self.max_z]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.min_x >= self.max_x || self.min_z >= self.max_z {
            return Err(ConfigError::InvalidBounds {
                min_x: self.min_x,
                max_x: self.max_x,
                min_z: self.min_z,
                max_z: self.max_z,
            });
        }
        Ok(())
    }

    /// Clamp the horizontal components of `position` into the area shrunk by
    /// `margin` on every side. The vertical component is untouched.
    ///
    /// An axis collapsed by an oversized margin pins to its midpoint.
    pub fn clamp(&self, position: Vec3, margin: f32) -> Vec3 {
        Vec3::new(
            clamp_axis(position.x, self.min_x + margin, self.max_x - margin),
            position.y,
            clamp_axis(position.z, self.min_z + margin, self.max_z - margin),
        )
    }

    /// Whether `position` lies inside the area shrunk by `margin`.
    pub fn contains(&self, position: Vec3, margin: f32) -> bool {
        self.clamp(position, margin) == position
    }

    /// Centre of the area at height zero.
    pub fn center(&self) -> Vec3 {
        Vec3::new(
            (self.min_x + self.max_x) * 0.5,
            0.0,
            (self.min_z + self.max_z) * 0.5,
        )
    }
}

fn clamp_axis(value: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) * 0.5
    } else {
        value.clamp(lo, hi)
    }
}

/// Anything that can be pulled back inside the play area.
pub trait BoundsClampable {
    fn clamp_into(&mut self, bounds: &Bounds, margin: f32);
}

impl BoundsClampable for Vec3 {
    fn clamp_into(&mut self, bounds: &Bounds, margin: f32) {
        *self = bounds.clamp(*self, margin);
    }
}

impl BoundsClampable for Pose {
    fn clamp_into(&mut self, bounds: &Bounds, margin: f32) {
        self.position.clamp_into(bounds, margin);
    }
}
