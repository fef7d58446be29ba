//! Household model
//!
//! The simulation's agent: a single household with a food insecurity phase
//! and a per-step aid flag. Households are created once by the population
//! generator and never added or removed afterwards; only `phase` and
//! `received_aid` change over a run.

use serde::{Deserialize, Serialize};

use crate::models::Phase;

/// A single household in the simulated population
///
/// # Example
/// ```
/// use aid_simulator_core_rs::{Household, Phase};
///
/// let mut household = Household::new(0, Phase::Stressed);
/// assert_eq!(household.id(), 0);
/// assert!(!household.received_aid());
///
/// household.set_received_aid(true);
/// household.set_phase(Phase::Minimal);
/// assert_eq!(household.phase(), Phase::Minimal);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Household {
    /// Stable identifier, equal to the household's position in the population
    id: u32,

    /// Current food insecurity phase
    phase: Phase,

    /// Whether this household was selected for aid in the current step
    ///
    /// Reset to false at the start of every allocation; only the allocator
    /// sets it, and only the recovery pass reads it.
    received_aid: bool,
}

impl Household {
    /// Create a household in the given phase with no aid received
    pub fn new(id: u32, phase: Phase) -> Self {
        Self {
            id,
            phase,
            received_aid: false,
        }
    }

    /// Stable household identifier
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the household holds aid this step
    pub fn received_aid(&self) -> bool {
        self.received_aid
    }

    /// Whether the household is in phase 3 or worse
    pub fn is_critical(&self) -> bool {
        self.phase.is_critical()
    }

    /// Overwrite the phase
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Overwrite the aid flag
    pub fn set_received_aid(&mut self, received: bool) {
        self.received_aid = received;
    }
}
