//! Fundamental geometric and simulation types.
//!
//! Axes: x = right, y = up (vertical), z = depth. "Horizontal" always means
//! the x/z plane.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::{DIRECTION_EPSILON, DT};

/// Position and orientation of an actor. Owned by exactly one actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Rigid body state attached to an actor.
///
/// Kinematic bodies are moved only by their owner; the integrator skips them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub velocity: Vec3,
    pub kinematic: bool,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Unit forward vector (local +Z).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Forward vector projected onto the horizontal plane, normalized.
    /// Falls back to world +Z if the actor is pitched straight up or down.
    pub fn horizontal_forward(&self) -> Vec3 {
        let f = flatten(self.forward());
        if f.length() > DIRECTION_EPSILON {
            f.normalize()
        } else {
            Vec3::Z
        }
    }

    /// Horizontal distance to a point (ignoring height).
    pub fn horizontal_distance_to(&self, point: Vec3) -> f32 {
        flatten(point - self.position).length()
    }
}

impl Body {
    pub fn kinematic() -> Self {
        Self {
            velocity: Vec3::ZERO,
            kinematic: true,
        }
    }

    /// Replace the horizontal velocity, keeping the vertical component.
    pub fn set_horizontal_velocity(&mut self, horizontal: Vec3) {
        self.velocity = Vec3::new(horizontal.x, self.velocity.y, horizontal.z);
    }

    pub fn horizontal_speed(&self) -> f32 {
        flatten(self.velocity).length()
    }
}

impl SimTime {
    /// Seconds per tick at the fixed tick rate.
    pub fn dt(&self) -> f32 {
        DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs = self.tick as f32 * DT;
    }
}

/// Drop the vertical component of a vector.
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Horizontal unit direction from `from` to `to`, or `None` when the two
/// points coincide within [`DIRECTION_EPSILON`].
pub fn horizontal_direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    let delta = flatten(to - from);
    let dist = delta.length();
    if dist > DIRECTION_EPSILON {
        Some(delta / dist)
    } else {
        None
    }
}

/// Yaw-only rotation that faces along a horizontal direction.
pub fn yaw_facing(direction: Vec3) -> Quat {
    Quat::from_rotation_y(direction.x.atan2(direction.z))
}
