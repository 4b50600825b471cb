//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Follower behavior state. Exactly one at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FollowerState {
    /// Circling the leader at the orbit radius. Body is kinematic.
    #[default]
    Orbiting,
    /// Travelling toward a landing target chosen by the leader.
    Ejected,
    /// Returning to the leader under player speed control.
    Detached,
}

/// Animation trigger emitted on state entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationCue {
    Attach,
    Eject,
    Return,
}

impl FollowerState {
    /// The animation cue fired when this state is entered.
    pub fn entry_cue(self) -> AnimationCue {
        match self {
            FollowerState::Orbiting => AnimationCue::Attach,
            FollowerState::Ejected => AnimationCue::Eject,
            FollowerState::Detached => AnimationCue::Return,
        }
    }

    pub fn is_orbiting(self) -> bool {
        self == FollowerState::Orbiting
    }
}
