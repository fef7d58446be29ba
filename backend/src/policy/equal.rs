//! Equal distribution policy
//!
//! The baseline strategy: every household has the same chance of receiving
//! aid, regardless of phase. Useful as the control arm when comparing
//! targeted strategies.

use crate::models::Population;
use crate::policy::{sample_without_replacement, AllocationPolicy, CapacityError};
use crate::rng::RngManager;

/// Uniform random aid allocation across the whole population
///
/// # Example
/// ```
/// use aid_simulator_core_rs::policy::{AllocationPolicy, EqualDistributionPolicy};
/// use aid_simulator_core_rs::generator::{BaselineDistribution, PopulationGenerator};
/// use aid_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(42);
/// let population =
///     PopulationGenerator::new(BaselineDistribution::default()).generate(100, &mut rng);
///
/// let policy = EqualDistributionPolicy::new();
/// let selected = policy.select(&population, 20, &mut rng).unwrap();
/// assert_eq!(selected.len(), 20);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EqualDistributionPolicy;

impl EqualDistributionPolicy {
    /// Create the policy
    pub fn new() -> Self {
        Self
    }
}

impl AllocationPolicy for EqualDistributionPolicy {
    fn select(
        &self,
        population: &Population,
        capacity: usize,
        rng: &mut RngManager,
    ) -> Result<Vec<usize>, CapacityError> {
        sample_without_replacement((0..population.len()).collect(), capacity, rng)
    }
}
