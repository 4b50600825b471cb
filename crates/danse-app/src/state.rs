//! Application state shared between the session controls and the game loop
//! thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use danse_core::commands::PlayerCommand;
use danse_core::input::InputFrame;
use danse_core::state::SimSnapshot;

/// Messages sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// Replace the input frame sampled on every following tick.
    Input(InputFrame),
    /// A player command to forward to the simulation engine.
    Command(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Shared application state.
///
/// - `mpsc::Sender` is wrapped in `Mutex` so the state is `Sync`.
/// - `Option`s are `None` until `start_simulation` runs.
/// - The latest snapshot is `Arc`-shared with the game loop thread.
pub struct AppState {
    /// Channel sender to forward commands to the game loop thread.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest snapshot, updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<SimSnapshot>>>,
    /// Game loop thread, joined on stop.
    pub loop_thread: Mutex<Option<JoinHandle<()>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            loop_thread: Mutex::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
