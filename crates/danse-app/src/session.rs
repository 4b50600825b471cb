//! Session controls over the game loop thread.
//!
//! These bridge a caller (the CLI driver, or any front end) to the game loop
//! through the channels held in [`AppState`].

use anyhow::{anyhow, bail, Context, Result};

use danse_core::commands::PlayerCommand;
use danse_core::config::SimConfig;
use danse_core::input::InputFrame;
use danse_core::state::SimSnapshot;

use crate::game_loop;
use crate::state::{AppState, GameLoopCommand};

/// Start the simulation. Fails if a session is already running.
pub fn start_simulation(state: &AppState, config: SimConfig) -> Result<()> {
    let mut thread = state.loop_thread.lock().map_err(|e| anyhow!(e.to_string()))?;
    if thread.is_some() {
        bail!("simulation already running");
    }

    let (cmd_tx, handle) = game_loop::spawn_game_loop(config, state.latest_snapshot.clone())?;

    let mut tx_lock = state.command_tx.lock().map_err(|e| anyhow!(e.to_string()))?;
    *tx_lock = Some(cmd_tx);
    *thread = Some(handle);

    Ok(())
}

/// Send a player command to the simulation.
pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<()> {
    send(state, GameLoopCommand::Command(command))
}

/// Replace the input frame the simulation samples each tick.
pub fn send_input(state: &AppState, input: InputFrame) -> Result<()> {
    send(state, GameLoopCommand::Input(input))
}

/// Get the latest snapshot, `None` before the first tick.
pub fn get_snapshot(state: &AppState) -> Result<Option<SimSnapshot>> {
    let lock = state.latest_snapshot.lock().map_err(|e| anyhow!(e.to_string()))?;
    Ok(lock.clone())
}

/// Stop the game loop and wait for its thread. No-op if not running.
pub fn stop_simulation(state: &AppState) -> Result<()> {
    let tx = state
        .command_tx
        .lock()
        .map_err(|e| anyhow!(e.to_string()))?
        .take();
    if let Some(tx) = tx {
        // A disconnected loop has already stopped.
        let _ = tx.send(GameLoopCommand::Shutdown);
    }

    let handle = state
        .loop_thread
        .lock()
        .map_err(|e| anyhow!(e.to_string()))?
        .take();
    if let Some(handle) = handle {
        handle
            .join()
            .map_err(|_| anyhow!("game loop thread panicked"))?;
    }
    Ok(())
}

fn send(state: &AppState, message: GameLoopCommand) -> Result<()> {
    let tx_lock = state.command_tx.lock().map_err(|e| anyhow!(e.to_string()))?;
    match tx_lock.as_ref() {
        Some(tx) => tx.send(message).context("game loop is gone"),
        None => bail!("simulation not started"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use danse_core::enums::FollowerState;

    #[test]
    fn test_send_before_start_fails() {
        let state = AppState::new();
        assert!(send_command(&state, PlayerCommand::Pause).is_err());
        assert!(send_input(&state, InputFrame::default()).is_err());
        assert!(get_snapshot(&state).unwrap().is_none());
    }

    #[test]
    fn test_start_twice_fails() {
        let state = AppState::new();
        start_simulation(&state, SimConfig::default()).unwrap();
        assert!(start_simulation(&state, SimConfig::default()).is_err());
        stop_simulation(&state).unwrap();
    }

    #[test]
    fn test_stop_is_idempotent_and_allows_restart() {
        let state = AppState::new();
        stop_simulation(&state).unwrap();

        start_simulation(&state, SimConfig::default()).unwrap();
        stop_simulation(&state).unwrap();
        stop_simulation(&state).unwrap();
        assert!(send_command(&state, PlayerCommand::Pause).is_err());

        start_simulation(&state, SimConfig::default()).unwrap();
        stop_simulation(&state).unwrap();
    }

    #[test]
    fn test_commands_reach_running_session() {
        let state = AppState::new();
        start_simulation(&state, SimConfig::default()).unwrap();
        send_input(&state, InputFrame::moving(0.0, 1.0)).unwrap();
        send_command(&state, PlayerCommand::Pause).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = None;
        while Instant::now() < deadline {
            if let Some(snap) = get_snapshot(&state).unwrap() {
                if snap.paused {
                    seen = Some(snap);
                    break;
                }
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        stop_simulation(&state).unwrap();

        let snap = seen.expect("pause should be applied");
        assert_eq!(snap.follower.state, FollowerState::Orbiting);
        assert!(snap.leader.position.x.abs() < 1e-6);
    }
}
