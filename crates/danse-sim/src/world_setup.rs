//! Entity spawn factories for setting up the simulation world.

use glam::Vec3;
use hecs::{Entity, World};

use danse_core::config::SimConfig;
use danse_core::types::{Body, Pose};
use danse_follower::Follower;

use crate::components::{FollowerTag, LeaderTag, Partner};
use crate::leader::LeaderController;

/// Spawn the pair: leader at the centre of the play area, follower one
/// orbit radius to its right. Each is wired to the other as its partner.
pub fn setup_session(world: &mut World, config: &SimConfig, phase_offset: f32) -> (Entity, Entity) {
    let center = config.bounds.center();
    let leader = spawn_leader(world, config, center);
    let follower_pos = center + Vec3::X * config.follower.orbit_radius;
    let follower = spawn_follower(world, config, follower_pos, phase_offset, Some(leader));
    set_partner(world, leader, Some(follower));
    (leader, follower)
}

/// Spawn a leader with no partner yet.
pub fn spawn_leader(world: &mut World, config: &SimConfig, position: Vec3) -> Entity {
    let controller = LeaderController::new(
        config.leader.clone(),
        config.bounds,
        config.follower.landing_margin(),
    );
    world.spawn((
        LeaderTag,
        Pose::new(position),
        Body::kinematic(),
        controller,
        Partner(None),
    ))
}

/// Spawn a follower orbiting `leader`. The follower is not placed on the
/// orbit circle; the orbit update glides it there.
pub fn spawn_follower(
    world: &mut World,
    config: &SimConfig,
    position: Vec3,
    phase_offset: f32,
    leader: Option<Entity>,
) -> Entity {
    let follower = Follower::new(config.follower.clone(), config.bounds, phase_offset);
    world.spawn((
        FollowerTag,
        Pose::new(position),
        Body::kinematic(),
        follower,
        Partner(leader),
    ))
}

/// Rewire an entity's partner. No-op if the entity is gone.
pub fn set_partner(world: &mut World, entity: Entity, partner: Option<Entity>) {
    if let Ok(mut slot) = world.get::<&mut Partner>(entity) {
        slot.0 = partner;
    }
}
