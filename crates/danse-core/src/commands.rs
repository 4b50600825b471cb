//! Discrete commands sent to the simulation.
//!
//! Commands are queued and processed at the next tick boundary. Continuous
//! input (movement, buttons) is sampled through `input::SignalSource` instead.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
    /// Force the follower into Detached (no-op if already Detached).
    ForceDetach,
    /// Put the follower back into orbit around the leader from any state.
    Reattach,
}
