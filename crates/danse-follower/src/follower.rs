//! Follower finite state machine.
//!
//! Three states with fixed edges:
//!
//! - Orbiting -> Ejected via [`Follower::start_eject`]
//! - Ejected -> Detached when the landing target is reached, or forced
//! - Detached -> Orbiting when within attach distance of the leader
//! - any -> Orbiting via [`Follower::reattach`]
//!
//! Any call whose precondition does not hold is a silent no-op.

use std::f32::consts::TAU;

use glam::Vec3;
use log::{debug, trace};

use danse_core::bounds::{Bounds, BoundsClampable};
use danse_core::config::FollowerConfig;
use danse_core::constants::DIRECTION_EPSILON;
use danse_core::enums::FollowerState;
use danse_core::events::SimEvent;
use danse_core::types::{flatten, horizontal_direction, Body, Pose};

use crate::steering::{move_towards, smooth_damp, turn_towards};

/// Per-tick input to the follower.
#[derive(Debug, Clone, Copy)]
pub struct FollowerContext {
    /// Leader position, if a leader is present.
    pub leader: Option<Vec3>,
    /// Simulation time at the start of this tick.
    pub elapsed_secs: f32,
    pub dt: f32,
    /// Return accelerate button held.
    pub accelerate: bool,
    /// Return stop button held. Wins over `accelerate`.
    pub stop: bool,
}

#[derive(Debug, Clone)]
pub struct Follower {
    config: FollowerConfig,
    bounds: Bounds,
    state: FollowerState,
    orbit_phase_offset: f32,
    landing_target: Option<Vec3>,
    return_speed: f32,
    /// Spring state of the orbit follow.
    orbit_velocity: Vec3,
    /// Launch kick waiting for its one integration step.
    launch_pending: bool,
    indicator_visible: bool,
}

impl Follower {
    /// Create a follower in Orbiting with the given initial phase offset.
    /// Call [`Follower::begin_session`] before the first update.
    pub fn new(config: FollowerConfig, bounds: Bounds, initial_phase_offset: f32) -> Self {
        let return_speed = config.base_return_speed;
        Self {
            config,
            bounds,
            state: FollowerState::Orbiting,
            orbit_phase_offset: initial_phase_offset.rem_euclid(TAU),
            landing_target: None,
            return_speed,
            orbit_velocity: Vec3::ZERO,
            launch_pending: false,
            indicator_visible: false,
        }
    }

    pub fn state(&self) -> FollowerState {
        self.state
    }

    pub fn landing_target(&self) -> Option<Vec3> {
        self.landing_target
    }

    pub fn return_speed(&self) -> f32 {
        self.return_speed
    }

    pub fn orbit_phase_offset(&self) -> f32 {
        self.orbit_phase_offset
    }

    pub fn indicator_visible(&self) -> bool {
        self.indicator_visible
    }

    pub fn config(&self) -> &FollowerConfig {
        &self.config
    }

    /// Orbit angle (radians) at simulation time `elapsed_secs`.
    pub fn orbit_angle(&self, elapsed_secs: f32) -> f32 {
        elapsed_secs * self.config.orbit_angular_speed + self.orbit_phase_offset
    }

    /// Point on the orbit circle around `leader` at `elapsed_secs`.
    pub fn orbit_point(&self, leader: Vec3, elapsed_secs: f32) -> Vec3 {
        let angle = self.orbit_angle(elapsed_secs);
        leader + Vec3::new(angle.cos(), 0.0, angle.sin()) * self.config.orbit_radius
    }

    /// Enter Orbiting at session start. Keeps the random initial phase offset
    /// and does not reposition the follower.
    pub fn begin_session(&mut self, body: &mut Body, events: &mut Vec<SimEvent>) {
        self.enter_orbiting(None, 0.0, Vec3::ZERO, body, events);
    }

    // --- External entry points ---

    /// Launch toward `landing_point`. Ignored unless Orbiting.
    ///
    /// Returns whether the eject was accepted.
    pub fn start_eject(
        &mut self,
        landing_point: Vec3,
        charge_distance: f32,
        pose: &Pose,
        body: &mut Body,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        if self.state != FollowerState::Orbiting {
            trace!("eject ignored in {:?}", self.state);
            return false;
        }

        let target = self.bounds.clamp(landing_point, self.config.landing_margin());
        let direction = horizontal_direction(pose.position, target)
            .unwrap_or_else(|| pose.horizontal_forward());

        self.state = FollowerState::Ejected;
        self.landing_target = Some(target);
        self.orbit_velocity = Vec3::ZERO;
        body.kinematic = false;

        let impulse = if self.config.eject_impulse_enabled {
            let magnitude = (charge_distance * self.config.force_per_unit_distance).clamp(
                self.config.min_eject_impulse,
                self.config.max_eject_impulse,
            );
            body.velocity += direction * magnitude;
            self.launch_pending = true;
            magnitude
        } else {
            0.0
        };

        self.hide_indicator(events);
        debug!(
            "follower ejected toward ({:.2}, {:.2}) distance {:.2} impulse {:.2}",
            target.x, target.z, charge_distance, impulse
        );
        events.push(SimEvent::StateEntered {
            state: self.state,
            cue: self.state.entry_cue(),
        });
        events.push(SimEvent::Ejected {
            landing_target: target,
            charge_distance,
            impulse,
        });
        true
    }

    /// Force Detached from Orbiting or Ejected. No-op if already Detached.
    pub fn force_detach(&mut self, body: &mut Body, events: &mut Vec<SimEvent>) {
        self.enter_detached(body, events);
    }

    /// Explicit reset into Orbiting from Ejected or Detached, keeping the
    /// follower where it is. No-op if already Orbiting.
    pub fn reattach(
        &mut self,
        leader: Option<Vec3>,
        elapsed_secs: f32,
        pose: &Pose,
        body: &mut Body,
        events: &mut Vec<SimEvent>,
    ) {
        if self.state == FollowerState::Orbiting {
            trace!("reattach ignored, already orbiting");
            return;
        }
        self.enter_orbiting(leader, elapsed_secs, pose.position, body, events);
    }

    pub fn show_indicator(&mut self, position: Vec3, events: &mut Vec<SimEvent>) {
        self.indicator_visible = true;
        events.push(SimEvent::IndicatorShown { position });
    }

    /// Hide the landing indicator. Emits only when it was visible.
    pub fn hide_indicator(&mut self, events: &mut Vec<SimEvent>) {
        if self.indicator_visible {
            self.indicator_visible = false;
            events.push(SimEvent::IndicatorHidden);
        }
    }

    // --- Per-tick update ---

    pub fn update(
        &mut self,
        ctx: &FollowerContext,
        pose: &mut Pose,
        body: &mut Body,
        events: &mut Vec<SimEvent>,
    ) {
        match self.state {
            FollowerState::Orbiting => self.update_orbiting(ctx, pose),
            FollowerState::Ejected => self.update_ejected(ctx, pose, body, events),
            FollowerState::Detached => self.update_detached(ctx, pose, body, events),
        }
    }

    fn update_orbiting(&mut self, ctx: &FollowerContext, pose: &mut Pose) {
        let Some(leader) = ctx.leader else {
            return;
        };

        let desired = self.orbit_point(leader, ctx.elapsed_secs);
        pose.position = smooth_damp(
            pose.position,
            desired,
            &mut self.orbit_velocity,
            self.config.orbit_smooth_time,
            self.config.orbit_max_speed,
            ctx.dt,
        );
        pose.rotation = turn_towards(
            pose.rotation,
            leader - pose.position,
            self.config.orbit_turn_rate,
            ctx.dt,
        );
    }

    fn update_ejected(
        &mut self,
        ctx: &FollowerContext,
        pose: &mut Pose,
        body: &mut Body,
        events: &mut Vec<SimEvent>,
    ) {
        if self.launch_pending {
            // The kick gets this tick's integration step untouched.
            self.launch_pending = false;
            pose.rotation = turn_towards(
                pose.rotation,
                body.velocity,
                self.config.travel_turn_rate,
                ctx.dt,
            );
            return;
        }

        let Some(mut target) = self.landing_target else {
            // Ejected without a target cannot make progress.
            self.enter_detached(body, events);
            return;
        };
        target.clamp_into(&self.bounds, self.config.landing_margin());
        self.landing_target = Some(target);

        let to_target = flatten(target - pose.position);
        let distance = to_target.length();

        if distance <= self.config.landing_reach_threshold {
            pose.position = Vec3::new(target.x, pose.position.y, target.z);
            body.set_horizontal_velocity(Vec3::ZERO);
            debug!("follower landed at ({:.2}, {:.2})", target.x, target.z);
            events.push(SimEvent::Landed {
                position: pose.position,
            });
            self.enter_detached(body, events);
            return;
        }

        let max_speed = self.config.max_return_speed * self.config.travel_speed_boost_factor;
        let mut speed = (distance * self.config.travel_speed_per_unit_distance)
            .clamp(self.config.min_travel_speed, max_speed);
        // Never step past the target.
        if ctx.dt > f32::EPSILON {
            speed = speed.min(distance / ctx.dt);
        }
        let direction = to_target / distance;
        body.set_horizontal_velocity(direction * speed);
        pose.rotation = turn_towards(
            pose.rotation,
            direction,
            self.config.travel_turn_rate,
            ctx.dt,
        );
    }

    fn update_detached(
        &mut self,
        ctx: &FollowerContext,
        pose: &mut Pose,
        body: &mut Body,
        events: &mut Vec<SimEvent>,
    ) {
        let Some(leader) = ctx.leader else {
            body.set_horizontal_velocity(Vec3::ZERO);
            return;
        };

        self.return_speed = if ctx.stop {
            0.0
        } else if ctx.accelerate {
            (self.return_speed + self.config.return_accel * ctx.dt).min(self.config.max_return_speed)
        } else {
            move_towards(
                self.return_speed,
                self.config.base_return_speed,
                self.config.return_coast_rate * ctx.dt,
            )
        }
        .clamp(0.0, self.config.max_return_speed);

        let to_leader = flatten(leader - pose.position);
        let distance = to_leader.length();
        let direction = if distance > DIRECTION_EPSILON {
            to_leader / distance
        } else {
            Vec3::ZERO
        };

        body.set_horizontal_velocity(direction * self.return_speed);
        // Holds its facing while stopped.
        if self.return_speed > 0.0 {
            pose.rotation = turn_towards(
                pose.rotation,
                direction,
                self.config.travel_turn_rate,
                ctx.dt,
            );
        }

        if distance <= self.config.attach_distance {
            let outward = if distance > DIRECTION_EPSILON {
                -direction
            } else {
                pose.horizontal_forward()
            };
            let on_circle = leader + outward * self.config.orbit_radius;
            pose.position = Vec3::new(on_circle.x, pose.position.y, on_circle.z);
            debug!(
                "follower attached at ({:.2}, {:.2})",
                pose.position.x, pose.position.z
            );
            events.push(SimEvent::Attached {
                position: pose.position,
            });
            self.enter_orbiting(Some(leader), ctx.elapsed_secs, pose.position, body, events);
        }
    }

    // --- State entry ---

    /// Enter Orbiting without moving the follower. With a leader, the phase
    /// offset is recomputed so the orbit formula reproduces the follower's
    /// current angle at `elapsed_secs`.
    fn enter_orbiting(
        &mut self,
        leader: Option<Vec3>,
        elapsed_secs: f32,
        position: Vec3,
        body: &mut Body,
        events: &mut Vec<SimEvent>,
    ) {
        if let Some(leader) = leader {
            let offset = flatten(position - leader);
            if offset.length() > DIRECTION_EPSILON {
                let angle = offset.z.atan2(offset.x);
                self.orbit_phase_offset =
                    (angle - elapsed_secs * self.config.orbit_angular_speed).rem_euclid(TAU);
            }
        }

        self.state = FollowerState::Orbiting;
        body.kinematic = true;
        body.velocity = Vec3::ZERO;
        self.orbit_velocity = Vec3::ZERO;
        self.return_speed = self.config.base_return_speed;
        self.landing_target = None;
        self.launch_pending = false;
        self.hide_indicator(events);

        debug!("follower orbiting, phase offset {:.3}", self.orbit_phase_offset);
        events.push(SimEvent::StateEntered {
            state: self.state,
            cue: self.state.entry_cue(),
        });
    }

    fn enter_detached(&mut self, body: &mut Body, events: &mut Vec<SimEvent>) {
        if self.state == FollowerState::Detached {
            trace!("already detached");
            return;
        }

        self.state = FollowerState::Detached;
        body.kinematic = false;
        self.return_speed = self.config.base_return_speed;
        self.landing_target = None;
        self.launch_pending = false;
        self.hide_indicator(events);

        debug!("follower detached");
        events.push(SimEvent::StateEntered {
            state: self.state,
            cue: self.state.entry_cue(),
        });
    }
}
