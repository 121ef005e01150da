//! Debate tuning knobs.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Temperatures and round count for one debate run.
///
/// `rounds` has no default: round 0 is the initial generation, so `rounds`
/// of 0 or 1 means initial generation followed directly by mediation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebateSettings {
    pub rounds: usize,
    pub initial_temperature: f32,
    pub mediator_temperature: f32,
}

impl DebateSettings {
    pub const DEFAULT_INITIAL_TEMPERATURE: f32 = 1.0;
    pub const DEFAULT_MEDIATOR_TEMPERATURE: f32 = 0.7;

    pub fn new(rounds: usize) -> Self {
        Self {
            rounds,
            initial_temperature: Self::DEFAULT_INITIAL_TEMPERATURE,
            mediator_temperature: Self::DEFAULT_MEDIATOR_TEMPERATURE,
        }
    }

    pub fn with_initial_temperature(mut self, temperature: f32) -> Self {
        self.initial_temperature = temperature;
        self
    }

    pub fn with_mediator_temperature(mut self, temperature: f32) -> Self {
        self.mediator_temperature = temperature;
        self
    }

    /// Number of refinement rounds after the initial generation.
    pub fn refinement_rounds(&self) -> usize {
        self.rounds.saturating_sub(1)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=2.0).contains(&self.initial_temperature) {
            return Err(DomainError::InvalidConfig(format!(
                "initial_temperature {} out of range 0.0..=2.0",
                self.initial_temperature
            )));
        }
        if !(0.0..=2.0).contains(&self.mediator_temperature) {
            return Err(DomainError::InvalidConfig(format!(
                "mediator_temperature {} out of range 0.0..=2.0",
                self.mediator_temperature
            )));
        }
        Ok(())
    }
}
