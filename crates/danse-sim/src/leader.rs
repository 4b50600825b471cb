//! Leader controller: movement inside the play area and the hold-to-charge
//! eject protocol.
//!
//! Pure data like the follower FSM. The leader system feeds it one
//! [`LeaderContext`] per tick and applies the returned [`ChargeAction`] to
//! the follower.

use glam::{Vec2, Vec3};
use log::debug;

use danse_core::bounds::Bounds;
use danse_core::config::LeaderConfig;
use danse_core::enums::FollowerState;
use danse_core::types::{horizontal_direction, Pose};
use danse_follower::steering::turn_towards;

/// Per-tick input to the leader.
#[derive(Debug, Clone, Copy)]
pub struct LeaderContext {
    /// Movement stick, already clamped to unit length.
    pub movement: Vec2,
    pub charge_held: bool,
    /// Partner state, `None` if the leader has no follower.
    pub follower_state: Option<FollowerState>,
    pub follower_position: Option<Vec3>,
    pub elapsed_secs: f32,
    pub dt: f32,
}

/// What the charge protocol asks of the follower this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChargeAction {
    /// Nothing charging; the indicator should be hidden.
    Idle,
    /// Charging: show the indicator at `landing_point`.
    Preview { landing_point: Vec3, distance: f32 },
    /// Charge released: eject toward `landing_point`.
    Release { landing_point: Vec3, distance: f32 },
    /// Charge abandoned because the follower left orbit.
    Cancel,
}

#[derive(Debug, Clone)]
pub struct LeaderController {
    config: LeaderConfig,
    bounds: Bounds,
    /// Clearance kept between a landing point and the bounds.
    landing_margin: f32,
    charge_timer: f32,
    is_charging: bool,
    last_eject_secs: Option<f32>,
    preview: Option<Vec3>,
}

impl LeaderController {
    pub fn new(config: LeaderConfig, bounds: Bounds, landing_margin: f32) -> Self {
        Self {
            config,
            bounds,
            landing_margin,
            charge_timer: 0.0,
            is_charging: false,
            last_eject_secs: None,
            preview: None,
        }
    }

    pub fn is_charging(&self) -> bool {
        self.is_charging
    }

    pub fn charge_timer(&self) -> f32 {
        self.charge_timer
    }

    /// Curve-shaped charge level in [0, 1].
    pub fn charge_level(&self) -> f32 {
        self.config
            .response_curve
            .evaluate(self.charge_timer / self.config.charge_max_time)
    }

    /// Eject distance for the current charge.
    pub fn target_distance(&self) -> f32 {
        let level = self.charge_level();
        self.config.min_eject_distance
            + (self.config.max_eject_distance - self.config.min_eject_distance) * level
    }

    /// Landing point previewed during the current charge.
    pub fn preview(&self) -> Option<Vec3> {
        self.preview
    }

    pub fn config(&self) -> &LeaderConfig {
        &self.config
    }

    /// Move the leader for one tick and keep it inside the play area.
    pub fn move_leader(&self, ctx: &LeaderContext, pose: &mut Pose) {
        let mut speed = self.config.move_speed;
        if matches!(
            ctx.follower_state,
            Some(FollowerState::Ejected | FollowerState::Detached)
        ) {
            speed *= self.config.detached_speed_multiplier;
        }

        let step = Vec3::new(ctx.movement.x, 0.0, ctx.movement.y) * speed * ctx.dt;
        pose.position = self
            .bounds
            .clamp(pose.position + step, self.config.bounds_margin);
        pose.rotation = turn_towards(pose.rotation, step, self.config.turn_rate, ctx.dt);
    }

    /// Advance the charge protocol. Call after [`LeaderController::move_leader`]
    /// so targeting uses this tick's leader position.
    pub fn update_charge(&mut self, ctx: &LeaderContext, pose: &Pose) -> ChargeAction {
        let orbiting = ctx.follower_state == Some(FollowerState::Orbiting);

        if ctx.charge_held && orbiting {
            if !self.is_charging {
                if !self.cooldown_elapsed(ctx.elapsed_secs) {
                    return ChargeAction::Idle;
                }
                self.is_charging = true;
                self.charge_timer = 0.0;
            }
            self.charge_timer =
                (self.charge_timer + ctx.dt).clamp(0.0, self.config.charge_max_time);
            let (landing_point, distance) = self.landing_point(pose, ctx.follower_position);
            self.preview = Some(landing_point);
            return ChargeAction::Preview {
                landing_point,
                distance,
            };
        }

        if !self.is_charging {
            return ChargeAction::Idle;
        }

        if !ctx.charge_held && orbiting {
            let (landing_point, distance) = self.landing_point(pose, ctx.follower_position);
            debug!(
                "charge released after {:.2}s, distance {:.2}",
                self.charge_timer, distance
            );
            self.reset_charge();
            self.last_eject_secs = Some(ctx.elapsed_secs);
            return ChargeAction::Release {
                landing_point,
                distance,
            };
        }

        debug!("charge cancelled, follower left orbit");
        self.reset_charge();
        ChargeAction::Cancel
    }

    /// Landing point and eject distance for the current charge, measured
    /// outward from the leader through the follower.
    pub fn landing_point(&self, pose: &Pose, follower_position: Option<Vec3>) -> (Vec3, f32) {
        let direction = follower_position
            .and_then(|f| horizontal_direction(pose.position, f))
            .unwrap_or_else(|| pose.horizontal_forward());
        let distance = self.target_distance();
        let point = self
            .bounds
            .clamp(pose.position + direction * distance, self.landing_margin);
        (point, distance)
    }

    fn cooldown_elapsed(&self, now: f32) -> bool {
        self.last_eject_secs
            .map_or(true, |last| now - last >= self.config.eject_cooldown)
    }

    fn reset_charge(&mut self) {
        self.is_charging = false;
        self.charge_timer = 0.0;
        self.preview = None;
    }
}
