//! Events emitted by the simulation for animation, indicator and UI
//! collaborators. Advisory only: nothing in the core waits on them.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::{AnimationCue, FollowerState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// Follower entered a state; `cue` is the animation trigger to fire.
    StateEntered {
        state: FollowerState,
        cue: AnimationCue,
    },
    /// Landing indicator should be shown (or moved) at `position`.
    IndicatorShown { position: Vec3 },
    /// Landing indicator should be hidden.
    IndicatorHidden,
    /// Follower was launched toward `landing_target`.
    Ejected {
        landing_target: Vec3,
        charge_distance: f32,
        /// Horizontal speed of the launch kick (0 when the kick is disabled).
        impulse: f32,
    },
    /// Ejected follower reached its landing target.
    Landed { position: Vec3 },
    /// Detached follower re-attached to the leader.
    Attached { position: Vec3 },
}
