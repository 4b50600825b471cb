//! Rigid body integration.
//!
//! Non-kinematic bodies fall under gravity, integrate velocity into
//! position, and stop on the ground plane. Kinematic bodies are skipped;
//! their owners move them directly.

use hecs::World;

use danse_core::config::PhysicsConfig;
use danse_core::types::{Body, Pose};

pub fn run(world: &mut World, physics: &PhysicsConfig, dt: f32) {
    for (_entity, (pose, body)) in world.query_mut::<(&mut Pose, &mut Body)>() {
        if body.kinematic {
            continue;
        }
        body.velocity.y -= physics.gravity * dt;
        pose.position += body.velocity * dt;
        if pose.position.y < physics.ground_height {
            pose.position.y = physics.ground_height;
            body.velocity.y = body.velocity.y.max(0.0);
        }
    }
}
