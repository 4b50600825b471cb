//! Follower behavior for danse.
//!
//! Implements the Orbiting / Ejected / Detached state machine and the
//! steering helpers it moves with. Operates on plain data; the simulation
//! crate owns the entities and decides when to call in.

pub mod follower;
pub mod steering;

pub use danse_core as core;
pub use follower::{Follower, FollowerContext};

#[cfg(test)]
mod tests;
