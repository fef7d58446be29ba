//! Population generation module
//!
//! Builds the synthetic household population a run starts from. All
//! generation is deterministic based on the RNG seed: same seed + same
//! distribution → same population.
//!
//! # Key Principles
//!
//! 1. **Determinism**: households are generated in id order, one phase draw
//!    per household
//! 2. **Validated weights**: a distribution is checked at construction, not
//!    at sample time
//! 3. **Fixed baseline**: the default distribution is the canonical baseline
//!    {Minimal: 0.25, Stressed: 0.30, Crisis: 0.30, Emergency: 0.15}
//!
//! # Example
//!
//! ```
//! use aid_simulator_core_rs::generator::{BaselineDistribution, PopulationGenerator};
//! use aid_simulator_core_rs::RngManager;
//!
//! let generator = PopulationGenerator::new(BaselineDistribution::default());
//! let mut rng = RngManager::new(42);
//! let population = generator.generate(1000, &mut rng);
//! assert_eq!(population.len(), 1000);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Household, Phase, Population};
use crate::rng::RngManager;

/// Errors raised when constructing a phase distribution
#[derive(Debug, Error, PartialEq)]
pub enum DistributionError {
    #[error("negative weight {weight} for phase {phase}")]
    NegativeWeight { phase: Phase, weight: f64 },

    #[error("phase weights sum to {sum}, expected 1.0")]
    WeightSumMismatch { sum: f64 },
}

/// Probability distribution over the four phases
///
/// Weights are indexed in severity order and must be non-negative and sum
/// to 1.0 (within floating-point tolerance).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineDistribution {
    /// Weight per phase, in `Phase::ALL` order
    weights: [f64; 4],
}

impl Default for BaselineDistribution {
    /// The canonical baseline: 25% Minimal, 30% Stressed, 30% Crisis,
    /// 15% Emergency
    fn default() -> Self {
        Self {
            weights: [0.25, 0.30, 0.30, 0.15],
        }
    }
}

impl BaselineDistribution {
    const SUM_TOLERANCE: f64 = 1e-9;

    /// Create a distribution from explicit weights (severity order)
    ///
    /// # Example
    /// ```
    /// use aid_simulator_core_rs::generator::BaselineDistribution;
    ///
    /// let dist = BaselineDistribution::new([0.1, 0.2, 0.3, 0.4]).unwrap();
    /// assert!(BaselineDistribution::new([0.5, 0.5, 0.5, 0.5]).is_err());
    /// ```
    pub fn new(weights: [f64; 4]) -> Result<Self, DistributionError> {
        for (phase, &weight) in Phase::ALL.iter().zip(weights.iter()) {
            if weight < 0.0 {
                return Err(DistributionError::NegativeWeight {
                    phase: *phase,
                    weight,
                });
            }
        }

        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > Self::SUM_TOLERANCE {
            return Err(DistributionError::WeightSumMismatch { sum });
        }

        Ok(Self { weights })
    }

    /// Weight assigned to a phase
    pub fn weight(&self, phase: Phase) -> f64 {
        self.weights[(phase.index() - 1) as usize]
    }

    /// Draw one phase, consuming exactly one uniform draw
    ///
    /// Walks phases in severity order subtracting weights from the draw;
    /// the strict comparison keeps zero-weight phases unreachable.
    pub fn sample(&self, rng: &mut RngManager) -> Phase {
        let mut target = rng.next_f64();

        for phase in Phase::ALL {
            target -= self.weight(phase);
            if target < 0.0 {
                return phase;
            }
        }

        // Rounding can leave a sliver above the final cumulative weight;
        // the last phase absorbs it.
        Phase::Emergency
    }
}

/// Generator for the initial household population
pub struct PopulationGenerator {
    baseline: BaselineDistribution,
}

impl PopulationGenerator {
    /// Create a generator drawing phases from `baseline`
    pub fn new(baseline: BaselineDistribution) -> Self {
        Self { baseline }
    }

    /// The distribution this generator draws from
    pub fn baseline(&self) -> &BaselineDistribution {
        &self.baseline
    }

    /// Generate `num_households` households with i.i.d. phases
    ///
    /// Households are created in id order (0..n) with one RNG draw each, so
    /// the population is a pure function of the seed and the distribution.
    pub fn generate(&self, num_households: usize, rng: &mut RngManager) -> Population {
        let mut households = Vec::with_capacity(num_households);

        for id in 0..num_households {
            let phase = self.baseline.sample(rng);
            households.push(Household::new(id as u32, phase));
        }

        Population::new(households)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_baseline_is_valid() {
        let dist = BaselineDistribution::default();
        let sum: f64 = Phase::ALL.iter().map(|&p| dist.weight(p)).sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert_eq!(dist.weight(Phase::Stressed), 0.30);
        assert_eq!(dist.weight(Phase::Emergency), 0.15);
    }

    #[test]
    fn test_new_rejects_negative_weight() {
        let result = BaselineDistribution::new([0.5, -0.1, 0.4, 0.2]);
        assert!(matches!(
            result,
            Err(DistributionError::NegativeWeight { .. })
        ));
    }

    #[test]
    fn test_new_rejects_bad_sum() {
        let result = BaselineDistribution::new([0.25, 0.25, 0.25, 0.20]);
        assert!(matches!(
            result,
            Err(DistributionError::WeightSumMismatch { .. })
        ));
    }

    #[test]
    fn test_sample_deterministic() {
        let dist = BaselineDistribution::default();
        let mut rng1 = RngManager::new(42);
        let mut rng2 = RngManager::new(42);

        for _ in 0..500 {
            assert_eq!(dist.sample(&mut rng1), dist.sample(&mut rng2));
        }
    }

    #[test]
    fn test_sample_never_picks_zero_weight_phase() {
        let dist = BaselineDistribution::new([0.0, 0.5, 0.5, 0.0]).unwrap();
        let mut rng = RngManager::new(7);

        for _ in 0..2000 {
            let phase = dist.sample(&mut rng);
            assert!(phase == Phase::Stressed || phase == Phase::Crisis);
        }
    }

    #[test]
    fn test_generate_assigns_sequential_ids() {
        let generator = PopulationGenerator::new(BaselineDistribution::default());
        let mut rng = RngManager::new(42);
        let population = generator.generate(100, &mut rng);

        assert_eq!(population.len(), 100);
        for (i, household) in population.households().iter().enumerate() {
            assert_eq!(household.id() as usize, i);
            assert!(!household.received_aid());
        }
    }

    #[test]
    fn test_generate_roughly_matches_baseline() {
        let generator = PopulationGenerator::new(BaselineDistribution::default());
        let mut rng = RngManager::new(42);
        let population = generator.generate(20_000, &mut rng);
        let counts = population.phase_counts();

        let n = population.len() as f64;
        for (phase, count) in counts.iter() {
            let expected = generator.baseline().weight(phase);
            let observed = count as f64 / n;
            // 20k samples keeps the empirical share within ~1.5% of the weight
            assert!(
                (observed - expected).abs() < 0.015,
                "phase {} share {} too far from weight {}",
                phase,
                observed,
                expected
            );
        }
    }

    #[test]
    fn test_generate_empty_population() {
        let generator = PopulationGenerator::new(BaselineDistribution::default());
        let mut rng = RngManager::new(42);
        let population = generator.generate(0, &mut rng);
        assert!(population.is_empty());
    }
}
