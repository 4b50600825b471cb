//! Snapshot system: reads the world and builds a `SimSnapshot`.
//!
//! Read-only: it never modifies the world.

use hecs::{Entity, World};

use danse_core::events::SimEvent;
use danse_core::state::{FollowerView, LeaderView, SimSnapshot};
use danse_core::types::{Body, Pose, SimTime};
use danse_follower::Follower;

use crate::leader::LeaderController;

pub fn build_snapshot(
    world: &World,
    leader: Entity,
    follower: Entity,
    time: &SimTime,
    paused: bool,
    events: Vec<SimEvent>,
) -> SimSnapshot {
    let leader_view = build_leader(world, leader);
    let follower_view = build_follower(world, follower, leader_view.position);
    SimSnapshot {
        time: *time,
        paused,
        leader: leader_view,
        follower: follower_view,
        events,
    }
}

fn build_leader(world: &World, leader: Entity) -> LeaderView {
    let mut query = match world.query_one::<(&Pose, &LeaderController)>(leader) {
        Ok(query) => query,
        Err(_) => return LeaderView::default(),
    };
    match query.get() {
        Some((pose, controller)) => LeaderView {
            position: pose.position,
            rotation: pose.rotation,
            is_charging: controller.is_charging(),
            charge_timer: controller.charge_timer(),
            charge_level: if controller.is_charging() {
                controller.charge_level()
            } else {
                0.0
            },
            preview_target: controller.preview(),
        },
        None => LeaderView::default(),
    }
}

fn build_follower(world: &World, follower: Entity, leader_position: glam::Vec3) -> FollowerView {
    let mut query = match world.query_one::<(&Pose, &Body, &Follower)>(follower) {
        Ok(query) => query,
        Err(_) => return FollowerView::default(),
    };
    match query.get() {
        Some((pose, body, follower)) => FollowerView {
            state: follower.state(),
            position: pose.position,
            rotation: pose.rotation,
            velocity: body.velocity,
            return_speed: follower.return_speed(),
            landing_target: follower.landing_target(),
            indicator_visible: follower.indicator_visible(),
            distance_to_leader: pose.horizontal_distance_to(leader_position),
        },
        None => FollowerView::default(),
    }
}
