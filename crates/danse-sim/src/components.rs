//! ECS components owned by the simulation crate.
//!
//! Poses and bodies come from `danse_core::types`; the leader carries a
//! `LeaderController`, the follower a `danse_follower::Follower`.

/// The other half of the pair: the follower for the leader, and the orbit
/// centre for the follower. `None` means the partner is absent and every
/// behavior depending on it is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partner(pub Option<hecs::Entity>);

/// Marker for the leader entity.
#[derive(Debug, Clone, Copy)]
pub struct LeaderTag;

/// Marker for the follower entity.
#[derive(Debug, Clone, Copy)]
pub struct FollowerTag;
