//! Follower system: runs each follower's state machine against its
//! partner leader's current position.

use hecs::{Entity, World};

use danse_core::events::SimEvent;
use danse_core::input::{SignalId, SignalSource};
use danse_core::types::{Body, Pose, SimTime};
use danse_follower::{Follower, FollowerContext};

use crate::components::{FollowerTag, Partner};

pub fn run(
    world: &mut World,
    input: &dyn SignalSource,
    time: &SimTime,
    events: &mut Vec<SimEvent>,
) {
    let followers: Vec<(Entity, Option<Entity>)> = world
        .query::<(&FollowerTag, &Partner)>()
        .iter()
        .map(|(entity, (_, partner))| (entity, partner.0))
        .collect();

    let accelerate = input.is_held(SignalId::Accelerate);
    let stop = input.is_held(SignalId::Stop);

    for (entity, partner) in followers {
        let ctx = FollowerContext {
            leader: leader_position(world, partner),
            elapsed_secs: time.elapsed_secs,
            dt: time.dt(),
            accelerate,
            stop,
        };
        if let Ok((follower, pose, body)) =
            world.query_one_mut::<(&mut Follower, &mut Pose, &mut Body)>(entity)
        {
            follower.update(&ctx, pose, body, events);
        }
    }
}

/// Position of the partner leader, if it exists.
pub fn leader_position(world: &World, partner: Option<Entity>) -> Option<glam::Vec3> {
    let leader = partner?;
    let pose = world.get::<&Pose>(leader).ok()?;
    Some(pose.position)
}
