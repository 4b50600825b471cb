//! Scripted sessions: a fixed input timeline played into the engine, either
//! directly or through the game loop thread.

use std::thread;

use anyhow::{anyhow, Result};
use log::{debug, info};

use danse_core::commands::PlayerCommand;
use danse_core::config::SimConfig;
use danse_core::events::SimEvent;
use danse_core::input::InputFrame;
use danse_core::state::SimSnapshot;
use danse_sim::SimulationEngine;

use crate::game_loop::TICK_DURATION;
use crate::session;
use crate::state::AppState;

/// Hold one input frame for a number of ticks, optionally sending a command
/// on the first of them.
#[derive(Debug, Clone, Copy)]
pub struct ScriptStep {
    pub ticks: usize,
    pub input: InputFrame,
    pub command: Option<PlayerCommand>,
}

impl ScriptStep {
    pub fn hold(ticks: usize, input: InputFrame) -> Self {
        Self {
            ticks,
            input,
            command: None,
        }
    }

    pub fn with_command(mut self, command: PlayerCommand) -> Self {
        self.command = Some(command);
        self
    }
}

/// What to feed the engine on one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScriptedTick {
    pub input: InputFrame,
    pub command: Option<PlayerCommand>,
}

/// Wander, charge fully, release, then call the follower home.
pub fn demo_script() -> Vec<ScriptStep> {
    let idle = InputFrame::default();
    vec![
        ScriptStep::hold(40, InputFrame::moving(1.0, 0.5)),
        ScriptStep::hold(30, idle),
        ScriptStep::hold(70, idle.with_charge(true)),
        ScriptStep::hold(80, idle),
        ScriptStep::hold(120, InputFrame::moving(-0.3, 0.0).with_accelerate(true)),
        ScriptStep::hold(100, idle),
    ]
}

/// Flatten `steps` into one entry per tick. With `total`, the result is
/// truncated or padded with idle ticks to exactly that length.
pub fn timeline(steps: &[ScriptStep], total: Option<usize>) -> Vec<ScriptedTick> {
    let mut ticks: Vec<ScriptedTick> = steps
        .iter()
        .flat_map(|step| {
            (0..step.ticks).map(move |i| ScriptedTick {
                input: step.input,
                command: if i == 0 { step.command } else { None },
            })
        })
        .collect();
    if let Some(total) = total {
        ticks.resize(total, ScriptedTick::default());
    }
    ticks
}

/// Play `ticks` straight into `engine`. Returns the last snapshot.
pub fn run_headless(engine: &mut SimulationEngine, ticks: &[ScriptedTick]) -> SimSnapshot {
    let mut last = engine.snapshot();
    for tick in ticks {
        if let Some(command) = tick.command {
            engine.queue_command(command);
        }
        last = engine.tick(&tick.input);
        log_events(&last);
    }
    last
}

/// Play `ticks` through a game loop thread at wall-clock pace. Returns the
/// last published snapshot.
pub fn run_realtime(config: SimConfig, ticks: &[ScriptedTick]) -> Result<SimSnapshot> {
    let state = AppState::new();
    session::start_simulation(&state, config)?;
    for tick in ticks {
        if let Some(command) = tick.command {
            session::send_command(&state, command)?;
        }
        session::send_input(&state, tick.input)?;
        thread::sleep(TICK_DURATION);
    }
    session::stop_simulation(&state)?;
    session::get_snapshot(&state)?.ok_or_else(|| anyhow!("no tick completed"))
}

/// Log the transitions in `snapshot`; indicator chatter only at debug.
pub fn log_events(snapshot: &SimSnapshot) {
    let tick = snapshot.time.tick;
    for event in &snapshot.events {
        match event {
            SimEvent::StateEntered { state, cue } => {
                info!("tick {tick}: follower {state:?} ({cue:?})");
            }
            SimEvent::Ejected {
                landing_target,
                charge_distance,
                ..
            } => info!(
                "tick {tick}: ejected {charge_distance:.2} toward ({:.2}, {:.2})",
                landing_target.x, landing_target.z
            ),
            SimEvent::Landed { position } => {
                info!("tick {tick}: landed at ({:.2}, {:.2})", position.x, position.z);
            }
            SimEvent::Attached { position } => {
                info!("tick {tick}: attached at ({:.2}, {:.2})", position.x, position.z);
            }
            SimEvent::IndicatorShown { .. } | SimEvent::IndicatorHidden => {
                debug!("tick {tick}: {event:?}");
            }
        }
    }
}
