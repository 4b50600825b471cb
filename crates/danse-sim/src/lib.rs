//! Simulation engine for danse.
//!
//! Owns the hecs ECS world holding the leader and follower, runs their
//! systems at a fixed tick rate, and produces `SimSnapshot`s.

pub mod components;
pub mod engine;
pub mod leader;
pub mod systems;
pub mod world_setup;

pub use danse_core as core;
pub use engine::SimulationEngine;
