//! Excitation state machine for the target molecule.
//!
//! ```text
//! Idle -> Absorbing -> Vibrating | Rotating | Glowing -> Emitting -> Idle
//!                   \-> BreakingApart (terminal)
//! ```
//!
//! `Absorbing` and `Emitting` last exactly one step. The excited states hold
//! the photon for a random time in the configured range.

use crate::molecules::absorption::ExcitationMode;
use crate::photon::WavelengthClass;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExcitationState {
    #[default]
    Idle,
    Absorbing,
    Vibrating,
    Rotating,
    Glowing,
    Emitting,
    BreakingApart,
}

impl ExcitationState {
    pub fn is_excited(&self) -> bool {
        matches!(
            self,
            ExcitationState::Vibrating | ExcitationState::Rotating | ExcitationState::Glowing
        )
    }
}

/// What a state machine step asks the owning model to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcitationEvent {
    None,
    EmitPhoton(WavelengthClass),
    BreakApart,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeExcitationStateMachine {
    state: ExcitationState,
    mode: Option<ExcitationMode>,
    absorbed_wavelength: Option<WavelengthClass>,
    hold_remaining_s: f64,
    hysteresis_remaining_s: f64,
    min_hold_time_s: f64,
    max_hold_time_s: f64,
    hysteresis_s: f64,
}

impl MoleculeExcitationStateMachine {
    pub fn new(min_hold_time_s: f64, max_hold_time_s: f64, hysteresis_s: f64) -> Self {
        Self {
            state: ExcitationState::Idle,
            mode: None,
            absorbed_wavelength: None,
            hold_remaining_s: 0.0,
            hysteresis_remaining_s: 0.0,
            min_hold_time_s,
            max_hold_time_s,
            hysteresis_s,
        }
    }

    pub fn state(&self) -> ExcitationState {
        self.state
    }

    pub fn absorbed_wavelength(&self) -> Option<WavelengthClass> {
        self.absorbed_wavelength
    }

    /// Idle and past the post-emission quiet period.
    pub fn can_absorb(&self) -> bool {
        self.state == ExcitationState::Idle && self.hysteresis_remaining_s <= 0.0
    }

    /// Take a photon. Returns `false` and leaves the state alone unless idle.
    pub fn begin_absorption(&mut self, wavelength: WavelengthClass, mode: ExcitationMode) -> bool {
        if !self.can_absorb() {
            return false;
        }
        self.state = ExcitationState::Absorbing;
        self.mode = Some(mode);
        self.absorbed_wavelength = Some(wavelength);
        true
    }

    pub fn step<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R) -> ExcitationEvent {
        match self.state {
            ExcitationState::Idle => {
                self.hysteresis_remaining_s = (self.hysteresis_remaining_s - dt).max(0.0);
                ExcitationEvent::None
            }
            ExcitationState::Absorbing => {
                let next = match self.mode {
                    Some(ExcitationMode::Vibration) => ExcitationState::Vibrating,
                    Some(ExcitationMode::Rotation) => ExcitationState::Rotating,
                    Some(ExcitationMode::Glow) => ExcitationState::Glowing,
                    Some(ExcitationMode::BreakApart) => {
                        self.state = ExcitationState::BreakingApart;
                        return ExcitationEvent::BreakApart;
                    }
                    None => ExcitationState::Idle,
                };
                self.hold_remaining_s = if self.max_hold_time_s > self.min_hold_time_s {
                    rng.random_range(self.min_hold_time_s..self.max_hold_time_s)
                } else {
                    self.min_hold_time_s
                };
                self.state = next;
                ExcitationEvent::None
            }
            ExcitationState::Vibrating | ExcitationState::Rotating | ExcitationState::Glowing => {
                self.hold_remaining_s -= dt;
                if self.hold_remaining_s <= 0.0 {
                    self.state = ExcitationState::Emitting;
                }
                ExcitationEvent::None
            }
            ExcitationState::Emitting => {
                let event = match self.absorbed_wavelength.take() {
                    Some(wavelength) => ExcitationEvent::EmitPhoton(wavelength),
                    None => ExcitationEvent::None,
                };
                self.state = ExcitationState::Idle;
                self.mode = None;
                self.hysteresis_remaining_s = self.hysteresis_s;
                event
            }
            ExcitationState::BreakingApart => ExcitationEvent::None,
        }
    }

    pub fn reset(&mut self) {
        self.state = ExcitationState::Idle;
        self.mode = None;
        self.absorbed_wavelength = None;
        self.hold_remaining_s = 0.0;
        self.hysteresis_remaining_s = 0.0;
    }
}
