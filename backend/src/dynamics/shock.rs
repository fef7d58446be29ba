//! Shock pass
//!
//! Models the downward pressure of a step: Stressed households risk falling
//! into Crisis and Crisis households into Emergency. Minimal and Emergency
//! households are untouched (there is no 1→2 shock on this scale, and
//! Emergency has nowhere worse to go).

use serde::{Deserialize, Serialize};

use crate::models::{Phase, Population};
use crate::rng::RngManager;

/// Per-step worsening probabilities
///
/// Both values are probabilities in [0, 1]; the simulation config validates
/// them before any pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShockRates {
    /// P(Stressed → Crisis) per step
    pub stressed_to_crisis: f64,

    /// P(Crisis → Emergency) per step
    pub crisis_to_emergency: f64,
}

impl Default for ShockRates {
    /// Canonical rates: 0.3 for Stressed → Crisis, 0.2 for Crisis → Emergency
    fn default() -> Self {
        Self {
            stressed_to_crisis: 0.3,
            crisis_to_emergency: 0.2,
        }
    }
}

/// Tally of transitions applied by one shock pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShockOutcome {
    /// Households moved Stressed → Crisis
    pub stressed_to_crisis: usize,

    /// Households moved Crisis → Emergency
    pub crisis_to_emergency: usize,
}

impl ShockOutcome {
    /// Total households that worsened this pass
    pub fn total(&self) -> usize {
        self.stressed_to_crisis + self.crisis_to_emergency
    }
}

/// Apply one shock pass to the whole population
///
/// Walks households in id order. Each household's transition is decided
/// from the phase it held when the pass reached it and each household is
/// visited exactly once, so a household degraded Stressed → Crisis is never
/// reconsidered for Crisis → Emergency in the same pass. Households in
/// ineligible phases consume no RNG draw.
///
/// Shock never improves a phase.
pub fn apply_shock(
    population: &mut Population,
    rates: &ShockRates,
    rng: &mut RngManager,
) -> ShockOutcome {
    let mut outcome = ShockOutcome::default();

    for household in population.households_mut() {
        match household.phase() {
            Phase::Stressed => {
                if rng.next_f64() < rates.stressed_to_crisis {
                    household.set_phase(Phase::Crisis);
                    outcome.stressed_to_crisis += 1;
                }
            }
            Phase::Crisis => {
                if rng.next_f64() < rates.crisis_to_emergency {
                    household.set_phase(Phase::Emergency);
                    outcome.crisis_to_emergency += 1;
                }
            }
            Phase::Minimal | Phase::Emergency => {}
        }
    }

    outcome
}
