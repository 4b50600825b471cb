//! Simulation snapshot: the complete visible state produced each tick.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::enums::FollowerState;
use crate::events::SimEvent;
use crate::types::SimTime;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub paused: bool,
    pub leader: LeaderView,
    pub follower: FollowerView,
    /// Events raised since the previous snapshot, in emission order.
    pub events: Vec<SimEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderView {
    pub position: Vec3,
    pub rotation: Quat,
    pub is_charging: bool,
    pub charge_timer: f32,
    /// Normalized charge after the response curve (0..1).
    pub charge_level: f32,
    /// Landing point currently previewed, if charging.
    pub preview_target: Option<Vec3>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowerView {
    pub state: FollowerState,
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub return_speed: f32,
    pub landing_target: Option<Vec3>,
    pub indicator_visible: bool,
    /// Horizontal distance to the leader.
    pub distance_to_leader: f32,
}
