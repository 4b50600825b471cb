//! danse runner.
//!
//! Wires the simulation crates into a game-loop thread and a small
//! command-line driver that plays a scripted session.

pub mod cli;
pub mod game_loop;
pub mod logging;
pub mod script;
pub mod session;
pub mod state;

pub use danse_core as core;
