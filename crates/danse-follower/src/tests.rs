use std::f32::consts::TAU;

use glam::Vec3;

use danse_core::bounds::Bounds;
use danse_core::config::FollowerConfig;
use danse_core::constants::DT;
use danse_core::enums::FollowerState;
use danse_core::events::SimEvent;
use danse_core::types::{flatten, Body, Pose};

use crate::follower::{Follower, FollowerContext};

/// A follower plus the pose/body it drives, integrated without gravity.
struct Rig {
    follower: Follower,
    pose: Pose,
    body: Body,
    events: Vec<SimEvent>,
    elapsed: f32,
}

impl Rig {
    fn new(config: FollowerConfig, position: Vec3) -> Self {
        let mut rig = Self {
            follower: Follower::new(config, Bounds::default(), 0.0),
            pose: Pose::new(position),
            body: Body::kinematic(),
            events: Vec::new(),
            elapsed: 0.0,
        };
        rig.follower.begin_session(&mut rig.body, &mut rig.events);
        rig.events.clear();
        rig
    }

    fn orbiting_at(position: Vec3) -> Self {
        Self::new(FollowerConfig::default(), position)
    }

    fn detached_at(position: Vec3) -> Self {
        let mut rig = Self::orbiting_at(position);
        rig.follower.force_detach(&mut rig.body, &mut rig.events);
        rig.events.clear();
        rig
    }

    fn eject(&mut self, target: Vec3, distance: f32) -> bool {
        self.follower
            .start_eject(target, distance, &self.pose, &mut self.body, &mut self.events)
    }

    fn step(&mut self, leader: Option<Vec3>, accelerate: bool, stop: bool) {
        let ctx = FollowerContext {
            leader,
            elapsed_secs: self.elapsed,
            dt: DT,
            accelerate,
            stop,
        };
        self.follower
            .update(&ctx, &mut self.pose, &mut self.body, &mut self.events);
        if !self.body.kinematic {
            self.pose.position += self.body.velocity * DT;
        }
        self.elapsed += DT;
    }

    fn count(&self, pred: impl Fn(&SimEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

fn entered(state: FollowerState) -> impl Fn(&SimEvent) -> bool {
    move |e| matches!(e, SimEvent::StateEntered { state: s, .. } if *s == state)
}

// ---- Ejection ----

#[test]
fn test_eject_ignored_unless_orbiting() {
    let mut rig = Rig::orbiting_at(Vec3::new(1.2, 0.0, 0.0));
    assert!(rig.eject(Vec3::new(5.0, 0.0, 5.0), 4.0));
    let target = rig.follower.landing_target();
    let velocity = rig.body.velocity;
    rig.events.clear();

    assert!(!rig.eject(Vec3::new(-5.0, 0.0, -5.0), 6.0));
    assert_eq!(rig.follower.state(), FollowerState::Ejected);
    assert_eq!(rig.follower.landing_target(), target);
    assert_eq!(rig.body.velocity, velocity);
    assert!(rig.events.is_empty());

    let mut detached = Rig::detached_at(Vec3::new(3.0, 0.0, 0.0));
    assert!(!detached.eject(Vec3::ZERO, 2.0));
    assert_eq!(detached.follower.state(), FollowerState::Detached);
    assert_eq!(detached.follower.landing_target(), None);
}

#[test]
fn test_eject_clamps_landing_target_into_bounds() {
    let mut rig = Rig::orbiting_at(Vec3::new(8.0, 0.0, 0.0));
    rig.eject(Vec3::new(30.0, 0.0, -30.0), 6.0);
    let margin = FollowerConfig::default().landing_margin();
    let target = rig.follower.landing_target().unwrap();
    assert!((target.x - (10.0 - margin)).abs() < 1e-5);
    assert!((target.z - (-8.0 + margin)).abs() < 1e-5);
    assert!(Bounds::default().contains(target, margin));
}

#[test]
fn test_eject_impulse_is_clamped_and_aimed() {
    let config = FollowerConfig::default();
    let mut rig = Rig::orbiting_at(Vec3::ZERO);
    rig.eject(Vec3::new(0.0, 0.0, 5.0), 100.0);
    assert!(!rig.body.kinematic);
    assert!((rig.body.velocity - Vec3::new(0.0, 0.0, config.max_eject_impulse)).length() < 1e-5);

    let mut rig = Rig::orbiting_at(Vec3::ZERO);
    rig.eject(Vec3::new(-5.0, 0.0, 0.0), 0.0);
    assert!((rig.body.velocity - Vec3::new(-config.min_eject_impulse, 0.0, 0.0)).length() < 1e-5);

    let ejected = rig.events.iter().find_map(|e| match e {
        SimEvent::Ejected { impulse, .. } => Some(*impulse),
        _ => None,
    });
    assert_eq!(ejected, Some(config.min_eject_impulse));
}

#[test]
fn test_eject_falls_back_to_facing_when_on_target() {
    let mut rig = Rig::orbiting_at(Vec3::new(2.0, 0.0, 1.0));
    // Identity rotation faces +Z.
    rig.eject(Vec3::new(2.0, 0.0, 1.0), 3.0);
    let v = rig.body.velocity.normalize();
    assert!((v - Vec3::Z).length() < 1e-5, "{v:?}");
}

#[test]
fn test_impulse_gets_one_step_before_seeking() {
    let mut rig = Rig::orbiting_at(Vec3::ZERO);
    rig.eject(Vec3::new(5.0, 0.0, 0.0), 0.0);
    let kick = rig.body.velocity;
    rig.step(None, false, false);
    assert!((rig.pose.position - kick * DT).length() < 1e-6);

    rig.step(None, false, false);
    let seek = rig.body.horizontal_speed();
    let remaining = 5.0 - kick.x * DT;
    let expected = (remaining * rig.follower.config().travel_speed_per_unit_distance).clamp(
        rig.follower.config().min_travel_speed,
        rig.follower.config().max_return_speed * rig.follower.config().travel_speed_boost_factor,
    );
    assert!((seek - expected).abs() < 1e-4, "{seek} vs {expected}");
}

#[test]
fn test_impulse_disabled_seeks_immediately() {
    let config = FollowerConfig {
        eject_impulse_enabled: false,
        ..Default::default()
    };
    let mut rig = Rig::new(config, Vec3::ZERO);
    rig.eject(Vec3::new(0.0, 0.0, 4.0), 4.0);
    assert_eq!(rig.body.velocity, Vec3::ZERO);
    rig.step(None, false, false);
    assert!(rig.body.velocity.z > 0.0);
    assert!(rig.pose.position.z > 0.0);
}

#[test]
fn test_ejected_lands_exactly_once() {
    let mut rig = Rig::orbiting_at(Vec3::new(1.2, 0.0, 0.0));
    let target = Vec3::new(5.0, 0.0, 5.0);
    rig.eject(target, 5.0);

    let mut ticks = 0;
    while rig.follower.state() == FollowerState::Ejected {
        rig.step(None, false, false);
        ticks += 1;
        assert!(ticks < 2_000, "ejected follower never landed");
    }
    assert_eq!(rig.follower.state(), FollowerState::Detached);
    assert!(flatten(target - rig.pose.position).length() <= 0.1);

    // Keep ticking without a leader: Detached holds, no repeat transition.
    for _ in 0..50 {
        rig.step(None, false, false);
    }
    assert_eq!(rig.count(|e| matches!(e, SimEvent::Landed { .. })), 1);
    assert_eq!(rig.count(entered(FollowerState::Detached)), 1);
    assert_eq!(rig.follower.landing_target(), None);
}

#[test]
fn test_landing_snaps_horizontal_only() {
    let mut rig = Rig::orbiting_at(Vec3::new(0.0, 0.5, 0.0));
    rig.eject(Vec3::new(0.05, 0.0, 0.0), 0.0);
    // Discard the kick so the next update is a pure reach check.
    rig.body.velocity = Vec3::ZERO;
    rig.pose.position = Vec3::new(0.02, 0.5, 0.0);
    rig.step(None, false, false);
    rig.step(None, false, false);
    assert_eq!(rig.follower.state(), FollowerState::Detached);
    assert_eq!(rig.pose.position.y, 0.5);
}

#[test]
fn test_travel_speed_bounds() {
    let config = FollowerConfig {
        eject_impulse_enabled: false,
        ..Default::default()
    };
    let max = config.max_return_speed * config.travel_speed_boost_factor;
    let min = config.min_travel_speed;

    let mut far = Rig::new(config.clone(), Vec3::new(-8.0, 0.0, 0.0));
    far.eject(Vec3::new(8.0, 0.0, 0.0), 16.0);
    far.step(None, false, false);
    assert!((far.body.horizontal_speed() - max).abs() < 1e-4);

    let mut near = Rig::new(config, Vec3::ZERO);
    near.eject(Vec3::new(0.2, 0.0, 0.0), 0.2);
    near.step(None, false, false);
    assert!((near.body.horizontal_speed() - min).abs() < 1e-4);
}

#[test]
fn test_ejected_lands_with_tight_reach_threshold() {
    // The reach threshold is far below one step at the minimum travel speed.
    let config = FollowerConfig {
        landing_reach_threshold: 0.005,
        eject_impulse_enabled: false,
        ..Default::default()
    };
    let target = Vec3::new(4.0, 0.0, 3.0);
    let mut rig = Rig::new(config, Vec3::ZERO);
    assert!(rig.eject(target, 5.0));

    for _ in 0..1000 {
        rig.step(None, false, false);
        if rig.follower.state() == FollowerState::Detached {
            break;
        }
    }

    assert_eq!(rig.follower.state(), FollowerState::Detached);
    assert_eq!(rig.count(|e| matches!(e, SimEvent::Landed { .. })), 1);
    assert!(flatten(rig.pose.position - target).length() < 1e-3);
}

#[test]
fn test_ejected_preserves_vertical_velocity() {
    let mut rig = Rig::orbiting_at(Vec3::ZERO);
    rig.eject(Vec3::new(4.0, 0.0, 0.0), 4.0);
    rig.step(None, false, false);
    rig.body.velocity.y = -3.0;
    rig.step(None, false, false);
    assert_eq!(rig.body.velocity.y, -3.0);
}

// ---- Detached ----

#[test]
fn test_stop_forces_zero_return_speed() {
    let leader = Vec3::new(-6.0, 0.0, 0.0);
    let mut rig = Rig::detached_at(Vec3::new(6.0, 0.0, 0.0));
    for _ in 0..3 {
        rig.step(Some(leader), true, true);
        assert_eq!(rig.follower.return_speed(), 0.0);
        assert_eq!(rig.body.horizontal_speed(), 0.0);
    }
}

#[test]
fn test_stop_holds_facing() {
    let leader = Vec3::new(5.0, 0.0, 0.0);
    let mut rig = Rig::detached_at(Vec3::ZERO);
    let facing = rig.pose.rotation;
    for _ in 0..3 {
        rig.step(Some(leader), false, true);
        assert_eq!(rig.pose.rotation, facing);
    }

    rig.step(Some(leader), false, false);
    assert_ne!(rig.pose.rotation, facing);
}

#[test]
fn test_accelerate_is_capped() {
    let config = FollowerConfig::default();
    let leader = Vec3::new(-9.0, 0.0, 0.0);
    let mut rig = Rig::detached_at(Vec3::new(9.0, 0.0, 0.0));
    let mut last = rig.follower.return_speed();
    for _ in 0..60 {
        rig.step(Some(leader), true, false);
        let speed = rig.follower.return_speed();
        assert!(speed >= last - 1e-6);
        assert!(speed <= config.max_return_speed);
        last = speed;
    }
    assert!((last - config.max_return_speed).abs() < 1e-5);
}

#[test]
fn test_coasts_back_to_cruise_speed() {
    let config = FollowerConfig::default();
    let leader = Vec3::new(-9.0, 0.0, -7.0);
    let mut rig = Rig::detached_at(Vec3::new(9.0, 0.0, 7.0));
    for _ in 0..20 {
        rig.step(Some(leader), true, false);
    }
    let boosted = rig.follower.return_speed();
    assert!(boosted > config.base_return_speed);

    rig.step(Some(leader), false, false);
    let expected = boosted - config.return_coast_rate * DT;
    assert!((rig.follower.return_speed() - expected).abs() < 1e-5);

    // From a stop it climbs back up to cruise.
    rig.step(Some(leader), false, true);
    assert_eq!(rig.follower.return_speed(), 0.0);
    for _ in 0..200 {
        rig.step(Some(leader), false, false);
        assert!(rig.follower.return_speed() <= config.base_return_speed + 1e-6);
    }
    assert!((rig.follower.return_speed() - config.base_return_speed).abs() < 1e-5);
}

#[test]
fn test_detached_returns_and_attaches_on_orbit_circle() {
    let leader = Vec3::new(1.0, 0.0, -2.0);
    let mut rig = Rig::detached_at(Vec3::new(7.0, 0.0, 4.0));

    let mut ticks = 0;
    while rig.follower.state() == FollowerState::Detached {
        rig.step(Some(leader), false, false);
        ticks += 1;
        assert!(ticks < 2_000, "detached follower never attached");
    }

    assert_eq!(rig.follower.state(), FollowerState::Orbiting);
    assert!(rig.body.kinematic);
    assert_eq!(rig.body.velocity, Vec3::ZERO);
    let radius = flatten(rig.pose.position - leader).length();
    assert!((radius - rig.follower.config().orbit_radius).abs() < 1e-4);
    assert_eq!(rig.count(|e| matches!(e, SimEvent::Attached { .. })), 1);
    assert_eq!(rig.count(entered(FollowerState::Orbiting)), 1);
}

#[test]
fn test_attach_keeps_position_on_orbit_formula() {
    let leader = Vec3::ZERO;
    let mut rig = Rig::detached_at(Vec3::new(0.0, 0.0, 1.3));
    rig.elapsed = 2.5;
    rig.step(Some(leader), false, false);
    assert_eq!(rig.follower.state(), FollowerState::Orbiting);

    // Attach happened during the tick at elapsed 2.5.
    let expected = rig.follower.orbit_point(leader, 2.5);
    assert!((flatten(expected - rig.pose.position)).length() < 1e-4);
}

#[test]
fn test_detached_without_leader_holds_position() {
    let mut rig = Rig::detached_at(Vec3::new(2.0, 0.0, 2.0));
    rig.body.velocity = Vec3::new(3.0, 0.0, 3.0);
    let before = rig.pose.position;
    for _ in 0..10 {
        rig.step(None, true, false);
    }
    assert_eq!(rig.pose.position, before);
    assert_eq!(rig.follower.state(), FollowerState::Detached);
}

#[test]
fn test_return_speed_bounds_under_mixed_input() {
    let config = FollowerConfig::default();
    let leader = Vec3::new(-9.0, 0.0, 7.0);
    let mut rig = Rig::detached_at(Vec3::new(9.0, 0.0, -7.0));
    for i in 0..300u32 {
        let accelerate = i % 7 < 4;
        let stop = i % 11 == 0;
        rig.step(Some(leader), accelerate, stop);
        if rig.follower.state() != FollowerState::Detached {
            break;
        }
        let speed = rig.follower.return_speed();
        assert!((0.0..=config.max_return_speed).contains(&speed), "{speed}");
    }
}

// ---- Orbiting ----

#[test]
fn test_reattach_reproduces_current_angle() {
    let leader = Vec3::new(2.0, 0.0, -1.0);
    let theta = 1.0_f32;
    let radius = FollowerConfig::default().orbit_radius;
    let start = leader + Vec3::new(theta.cos(), 0.0, theta.sin()) * radius;
    let mut rig = Rig::detached_at(start);

    let now = 3.7;
    let pose = rig.pose;
    rig.follower
        .reattach(Some(leader), now, &pose, &mut rig.body, &mut rig.events);

    assert_eq!(rig.follower.state(), FollowerState::Orbiting);
    assert_eq!(rig.pose.position, start, "entering orbit never moves the follower");
    let angle = rig.follower.orbit_angle(now).rem_euclid(TAU);
    assert!((angle - theta).abs() < 1e-4, "{angle} vs {theta}");
    assert!((rig.follower.orbit_point(leader, now) - start).length() < 1e-4);
}

#[test]
fn test_reattach_ignored_when_orbiting() {
    let mut rig = Rig::orbiting_at(Vec3::new(1.2, 0.0, 0.0));
    let offset = rig.follower.orbit_phase_offset();
    let pose = rig.pose;
    rig.follower
        .reattach(Some(Vec3::new(5.0, 0.0, 5.0)), 9.0, &pose, &mut rig.body, &mut rig.events);
    assert_eq!(rig.follower.orbit_phase_offset(), offset);
    assert!(rig.events.is_empty());
}

#[test]
fn test_first_orbit_step_after_reattach_is_small() {
    let leader = Vec3::ZERO;
    let mut rig = Rig::detached_at(Vec3::new(-1.2, 0.0, 0.0));
    let pose = rig.pose;
    rig.follower
        .reattach(Some(leader), rig.elapsed, &pose, &mut rig.body, &mut rig.events);
    // One tick of orbit arc is radius * angular_speed * dt.
    let config = rig.follower.config().clone();
    let arc = config.orbit_radius * config.orbit_angular_speed * DT;
    for _ in 0..3 {
        let before = rig.pose.position;
        rig.step(Some(leader), false, false);
        let moved = (rig.pose.position - before).length();
        assert!(moved <= arc + 1e-4, "{moved} > {arc}");
    }
}

#[test]
fn test_orbit_follows_moving_leader_without_popping() {
    let config = FollowerConfig::default();
    let mut rig = Rig::orbiting_at(Vec3::new(1.2, 0.0, 0.0));
    let mut leader = Vec3::ZERO;
    for i in 0..200 {
        // Leader teleports sideways once; follower must glide, not snap.
        if i == 100 {
            leader.x += 3.0;
        }
        let before = rig.pose.position;
        rig.step(Some(leader), false, false);
        let moved = (rig.pose.position - before).length();
        assert!(moved <= config.orbit_max_speed * DT + 1e-4);
    }
    let radius = flatten(rig.pose.position - leader).length();
    assert!((radius - config.orbit_radius).abs() < 0.05, "{radius}");
}

#[test]
fn test_orbiting_without_leader_is_noop() {
    let mut rig = Rig::orbiting_at(Vec3::new(3.0, 0.0, 3.0));
    let before = rig.pose;
    for _ in 0..10 {
        rig.step(None, false, false);
    }
    assert_eq!(rig.pose, before);
}

// ---- Indicator / forced transitions ----

#[test]
fn test_hide_indicator_emits_once() {
    let mut rig = Rig::orbiting_at(Vec3::ZERO);
    rig.follower
        .show_indicator(Vec3::new(3.0, 0.0, 0.0), &mut rig.events);
    assert!(rig.follower.indicator_visible());
    rig.follower.hide_indicator(&mut rig.events);
    rig.follower.hide_indicator(&mut rig.events);
    assert_eq!(rig.count(|e| matches!(e, SimEvent::IndicatorHidden)), 1);
}

#[test]
fn test_eject_hides_indicator() {
    let mut rig = Rig::orbiting_at(Vec3::ZERO);
    rig.follower
        .show_indicator(Vec3::new(3.0, 0.0, 0.0), &mut rig.events);
    rig.eject(Vec3::new(3.0, 0.0, 0.0), 3.0);
    assert!(!rig.follower.indicator_visible());
}

#[test]
fn test_force_detach_is_idempotent() {
    let mut rig = Rig::orbiting_at(Vec3::ZERO);
    rig.follower.force_detach(&mut rig.body, &mut rig.events);
    rig.follower.force_detach(&mut rig.body, &mut rig.events);
    assert_eq!(rig.follower.state(), FollowerState::Detached);
    assert!(!rig.body.kinematic);
    assert_eq!(rig.count(entered(FollowerState::Detached)), 1);
}

#[test]
fn test_begin_session_keeps_position_and_offset() {
    let config = FollowerConfig::default();
    let mut follower = Follower::new(config, Bounds::default(), 7.0);
    let mut body = Body::default();
    let mut events = Vec::new();
    follower.begin_session(&mut body, &mut events);
    assert!((follower.orbit_phase_offset() - (7.0 - TAU)).abs() < 1e-5);
    assert!(body.kinematic);
    assert_eq!(
        events,
        vec![SimEvent::StateEntered {
            state: FollowerState::Orbiting,
            cue: FollowerState::Orbiting.entry_cue(),
        }]
    );
}
