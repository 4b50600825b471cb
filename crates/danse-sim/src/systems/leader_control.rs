//! Leader system: movement, then the charge protocol, then whatever the
//! charge asks of the follower.
//!
//! Ejection is a direct call into the follower, so the follower may change
//! state in the middle of a tick, before its own update runs.

use hecs::{Entity, World};

use danse_core::events::SimEvent;
use danse_core::input::{SignalId, SignalSource};
use danse_core::types::{Body, Pose, SimTime};
use danse_follower::Follower;

use crate::components::{LeaderTag, Partner};
use crate::leader::{ChargeAction, LeaderContext, LeaderController};

pub fn run(
    world: &mut World,
    input: &dyn SignalSource,
    time: &SimTime,
    events: &mut Vec<SimEvent>,
) {
    let leaders: Vec<(Entity, Option<Entity>)> = world
        .query::<(&LeaderTag, &Partner)>()
        .iter()
        .map(|(entity, (_, partner))| (entity, partner.0))
        .collect();

    for (leader, partner) in leaders {
        run_leader(world, leader, partner, input, time, events);
    }
}

fn run_leader(
    world: &mut World,
    leader: Entity,
    partner: Option<Entity>,
    input: &dyn SignalSource,
    time: &SimTime,
    events: &mut Vec<SimEvent>,
) {
    let (follower_state, follower_position) = partner
        .and_then(|entity| {
            let follower = world.get::<&Follower>(entity).ok()?;
            let pose = world.get::<&Pose>(entity).ok()?;
            Some((follower.state(), pose.position))
        })
        .unzip();

    let ctx = LeaderContext {
        movement: input.movement(),
        charge_held: input.is_held(SignalId::Charge),
        follower_state,
        follower_position,
        elapsed_secs: time.elapsed_secs,
        dt: time.dt(),
    };

    let Ok((controller, pose)) = world.query_one_mut::<(&mut LeaderController, &mut Pose)>(leader)
    else {
        return;
    };
    controller.move_leader(&ctx, pose);
    let action = controller.update_charge(&ctx, pose);

    let Some(partner) = partner else {
        return;
    };
    let Ok((follower, pose, body)) =
        world.query_one_mut::<(&mut Follower, &Pose, &mut Body)>(partner)
    else {
        return;
    };

    match action {
        ChargeAction::Idle | ChargeAction::Cancel => follower.hide_indicator(events),
        ChargeAction::Preview { landing_point, .. } => {
            follower.show_indicator(landing_point, events);
        }
        ChargeAction::Release {
            landing_point,
            distance,
        } => {
            follower.start_eject(landing_point, distance, pose, body, events);
            follower.hide_indicator(events);
        }
    }
}
