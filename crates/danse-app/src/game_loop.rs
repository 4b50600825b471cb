//! Game loop thread: runs the simulation engine at the fixed tick rate and
//! publishes snapshots.
//!
//! Input frames and commands arrive via an `mpsc` channel. The most recent
//! input frame is held and sampled on every tick until a new one arrives.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::Context;
use log::{debug, info};

use danse_core::config::SimConfig;
use danse_core::constants::TICK_RATE;
use danse_core::input::InputFrame;
use danse_core::state::SimSnapshot;
use danse_sim::SimulationEngine;

use crate::state::GameLoopCommand;

/// Duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Validates `config`, then spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    config: SimConfig,
    latest_snapshot: Arc<Mutex<Option<SimSnapshot>>>,
) -> anyhow::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let engine = SimulationEngine::try_new(config).context("invalid session config")?;
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("danse-game-loop".into())
        .spawn(move || {
            run_game_loop(engine, cmd_rx, &latest_snapshot);
        })
        .context("failed to spawn game loop thread")?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<SimSnapshot>>,
) {
    let mut input = InputFrame::default();
    let mut next_tick_time = Instant::now();
    info!("game loop started at {} Hz", TICK_RATE);

    loop {
        // 1. Drain all pending messages
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Input(frame)) => input = frame,
                Ok(GameLoopCommand::Command(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!("game loop stopped at tick {}", engine.time().tick);
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick(&input);
        for event in &snapshot.events {
            debug!("tick {}: {:?}", snapshot.time.tick, event);
        }

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}
