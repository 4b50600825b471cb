//! Core types and definitions for the danse simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! poses and bodies, play-area bounds, input signals, configuration,
//! events, commands, snapshot views, and tuning constants.
//! It has no dependency on any runtime framework.

pub mod bounds;
pub mod commands;
pub mod config;
pub mod constants;
pub mod curve;
pub mod enums;
pub mod events;
pub mod input;
pub mod state;
pub mod types;
