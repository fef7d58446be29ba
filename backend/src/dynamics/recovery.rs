//! Recovery pass
//!
//! Models the effect of aid: households holding aid this step may improve by
//! exactly one phase. Unaided households never improve, whatever their
//! phase. The improvement probability depends on how deep the household
//! currently sits, reflecting that earlier intervention is more effective
//! per household than crisis response.

use serde::{Deserialize, Serialize};

use crate::models::{Phase, Population};
use crate::rng::RngManager;

/// Per-step improvement probabilities for aided households
///
/// Probabilities in [0, 1], validated by the simulation config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryRates {
    /// P(Emergency → Crisis) for an aided household (canonical 0.6)
    pub emergency_to_crisis: f64,

    /// P(Crisis → Stressed) for an aided household (canonical 0.5)
    pub crisis_to_stressed: f64,

    /// P(Stressed → Minimal) for an aided household (canonical 0.4)
    pub stressed_to_minimal: f64,
}

impl Default for RecoveryRates {
    fn default() -> Self {
        Self {
            emergency_to_crisis: 0.6,
            crisis_to_stressed: 0.5,
            stressed_to_minimal: 0.4,
        }
    }
}

/// Tally of transitions applied by one recovery pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryOutcome {
    /// Households moved Emergency → Crisis
    pub emergency_to_crisis: usize,

    /// Households moved Crisis → Stressed
    pub crisis_to_stressed: usize,

    /// Households moved Stressed → Minimal
    pub stressed_to_minimal: usize,
}

impl RecoveryOutcome {
    /// Total households that improved this pass
    pub fn total(&self) -> usize {
        self.emergency_to_crisis + self.crisis_to_stressed + self.stressed_to_minimal
    }
}

/// Apply one recovery pass over the aided households
///
/// Walks the population in id order, skipping households without aid (no
/// RNG draw for them). Each aided household is decided once from its
/// observed phase, so an improvement never chains into a second one within
/// the same pass. Aided Minimal households have nothing to improve to and
/// consume no draw.
///
/// Recovery never worsens a phase.
pub fn apply_recovery(
    population: &mut Population,
    rates: &RecoveryRates,
    rng: &mut RngManager,
) -> RecoveryOutcome {
    let mut outcome = RecoveryOutcome::default();

    for household in population.households_mut() {
        if !household.received_aid() {
            continue;
        }

        match household.phase() {
            Phase::Emergency => {
                if rng.next_f64() < rates.emergency_to_crisis {
                    household.set_phase(Phase::Crisis);
                    outcome.emergency_to_crisis += 1;
                }
            }
            Phase::Crisis => {
                if rng.next_f64() < rates.crisis_to_stressed {
                    household.set_phase(Phase::Stressed);
                    outcome.crisis_to_stressed += 1;
                }
            }
            Phase::Stressed => {
                if rng.next_f64() < rates.stressed_to_minimal {
                    household.set_phase(Phase::Minimal);
                    outcome.stressed_to_minimal += 1;
                }
            }
            Phase::Minimal => {}
        }
    }

    outcome
}
