//! Simulation engine: the fixed-step loop around the leader and follower.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs all systems, and produces `SimSnapshot`s. Headless, so sessions
//! replay deterministically from a seed and an input script.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use hecs::{Entity, World};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use danse_core::commands::PlayerCommand;
use danse_core::config::{ConfigError, SimConfig};
use danse_core::enums::FollowerState;
use danse_core::events::SimEvent;
use danse_core::input::SignalSource;
use danse_core::state::SimSnapshot;
use danse_core::types::{Body, Pose, SimTime};
use danse_follower::Follower;

use crate::systems;
use crate::world_setup;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    config: SimConfig,
    time: SimTime,
    paused: bool,
    leader: Entity,
    follower: Entity,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    /// Create an engine and start the session. The follower enters Orbiting
    /// at a seeded random phase around the leader.
    ///
    /// The config is assumed valid; see [`SimulationEngine::try_new`].
    pub fn new(config: SimConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let phase_offset = rng.gen_range(0.0..TAU);

        let mut world = World::new();
        let (leader, follower) = world_setup::setup_session(&mut world, &config, phase_offset);

        let mut events = Vec::new();
        if let Ok((f, body)) = world.query_one_mut::<(&mut Follower, &mut Body)>(follower) {
            f.begin_session(body, &mut events);
        }

        info!(
            "session started: seed {}, phase offset {:.3} rad",
            config.seed, phase_offset
        );

        Self {
            world,
            config,
            time: SimTime::default(),
            paused: false,
            leader,
            follower,
            command_queue: VecDeque::new(),
            events,
        }
    }

    /// Validate `config`, then start the session.
    pub fn try_new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    ///
    /// While paused, commands are still processed but no system runs and
    /// time stands still.
    pub fn tick(&mut self, input: &dyn SignalSource) -> SimSnapshot {
        self.process_commands();

        if !self.paused {
            self.run_systems(input);
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            self.leader,
            self.follower,
            &self.time,
            self.paused,
            events,
        )
    }

    /// Current state as a snapshot, without advancing or draining events.
    pub fn snapshot(&self) -> SimSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            self.leader,
            self.follower,
            &self.time,
            self.paused,
            Vec::new(),
        )
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn leader_entity(&self) -> Entity {
        self.leader
    }

    pub fn follower_entity(&self) -> Entity {
        self.follower
    }

    /// Current follower state, `None` if the follower entity is gone.
    pub fn follower_state(&self) -> Option<FollowerState> {
        self.world
            .get::<&Follower>(self.follower)
            .ok()
            .map(|f| f.state())
    }

    /// Drop the follower's reference to its leader (for testing).
    #[cfg(test)]
    pub fn clear_leader_reference(&mut self) {
        world_setup::set_partner(&mut self.world, self.follower, None);
    }

    /// Teleport the follower (for testing).
    #[cfg(test)]
    pub fn place_follower(&mut self, position: glam::Vec3) {
        if let Ok(mut pose) = self.world.get::<&mut Pose>(self.follower) {
            pose.position = position;
        }
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        debug!("command {:?} at tick {}", command, self.time.tick);
        match command {
            PlayerCommand::Pause => self.paused = true,
            PlayerCommand::Resume => self.paused = false,
            PlayerCommand::ForceDetach => {
                if let Ok((follower, body)) = self
                    .world
                    .query_one_mut::<(&mut Follower, &mut Body)>(self.follower)
                {
                    follower.force_detach(body, &mut self.events);
                }
            }
            PlayerCommand::Reattach => {
                let leader = self
                    .world
                    .get::<&Pose>(self.leader)
                    .ok()
                    .map(|pose| pose.position);
                let elapsed = self.time.elapsed_secs;
                if let Ok((follower, pose, body)) =
                    self.world
                        .query_one_mut::<(&mut Follower, &Pose, &mut Body)>(self.follower)
                {
                    follower.reattach(leader, elapsed, pose, body, &mut self.events);
                }
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, input: &dyn SignalSource) {
        // 1. Leader movement, charge and eject
        systems::leader_control::run(&mut self.world, input, &self.time, &mut self.events);
        // 2. Follower state machine
        systems::follower::run(&mut self.world, input, &self.time, &mut self.events);
        // 3. Rigid body integration
        systems::physics::run(&mut self.world, &self.config.physics, self.time.dt());
    }
}
