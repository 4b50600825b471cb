//! Per-tick input sampling.
//!
//! The simulation never owns input devices. Each tick it is handed a
//! [`SignalSource`] and reads the signals it needs from it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::ANALOG_DEADZONE;

/// Every signal the simulation samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalId {
    /// Leader movement, horizontal axis (-1..1).
    MoveX,
    /// Leader movement, depth axis (-1..1).
    MoveY,
    /// Leader charge button.
    Charge,
    /// Follower return accelerate button.
    Accelerate,
    /// Follower return stop button.
    Stop,
}

pub trait SignalSource {
    fn read_signal(&self, id: SignalId) -> f32;

    /// Analog button threshold.
    fn is_held(&self, id: SignalId) -> bool {
        self.read_signal(id) > ANALOG_DEADZONE
    }

    /// Movement stick, clamped to unit length.
    fn movement(&self) -> Vec2 {
        Vec2::new(
            self.read_signal(SignalId::MoveX),
            self.read_signal(SignalId::MoveY),
        )
        .clamp_length_max(1.0)
    }
}

impl<F> SignalSource for F
where
    F: Fn(SignalId) -> f32,
{
    fn read_signal(&self, id: SignalId) -> f32 {
        self(id)
    }
}

/// A recorded sample of every signal, suitable for sending across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFrame {
    pub move_x: f32,
    pub move_y: f32,
    pub charge: f32,
    pub accelerate: f32,
    pub stop: f32,
}

impl InputFrame {
    pub fn moving(x: f32, y: f32) -> Self {
        Self {
            move_x: x,
            move_y: y,
            ..Default::default()
        }
    }

    pub fn with_charge(mut self, held: bool) -> Self {
        self.charge = if held { 1.0 } else { 0.0 };
        self
    }

    pub fn with_accelerate(mut self, held: bool) -> Self {
        self.accelerate = if held { 1.0 } else { 0.0 };
        self
    }

    pub fn with_stop(mut self, held: bool) -> Self {
        self.stop = if held { 1.0 } else { 0.0 };
        self
    }
}

impl SignalSource for InputFrame {
    fn read_signal(&self, id: SignalId) -> f32 {
        match id {
            SignalId::MoveX => self.move_x,
            SignalId::MoveY => self.move_y,
            SignalId::Charge => self.charge,
            SignalId::Accelerate => self.accelerate,
            SignalId::Stop => self.stop,
        }
    }
}
