//! Steering primitives: critically damped follow, linear approach, and
//! smooth yaw turning.

use glam::{Quat, Vec3};

use danse_core::types::{flatten, yaw_facing};
use danse_core::constants::DIRECTION_EPSILON;

/// Critically damped spring toward `target`.
///
/// `velocity` carries the spring state between calls and must be reset when
/// the caller starts following from rest. Never overshoots the target.
pub fn smooth_damp(
    current: Vec3,
    target: Vec3,
    velocity: &mut Vec3,
    smooth_time: f32,
    max_speed: f32,
    dt: f32,
) -> Vec3 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    // Padé approximation of exp(-x).
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let max_change = max_speed * smooth_time;
    let change = (current - target).clamp_length_max(max_change);
    let clamped_target = current - change;

    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = clamped_target + (change + temp) * decay;

    // Landed past the original target: stop there.
    if (target - current).dot(output - target) > 0.0 {
        output = target;
        *velocity = Vec3::ZERO;
    }
    output
}

/// Move `current` toward `target` by at most `max_delta`.
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Turn toward a horizontal `direction` by slerping at `rate` per second.
/// Degenerate directions leave the rotation unchanged.
pub fn turn_towards(rotation: Quat, direction: Vec3, rate: f32, dt: f32) -> Quat {
    let direction = flatten(direction);
    if direction.length() <= DIRECTION_EPSILON {
        return rotation;
    }
    let goal = yaw_facing(direction.normalize());
    rotation.slerp(goal, (rate * dt).clamp(0.0, 1.0)).normalize()
}
