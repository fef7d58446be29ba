//! Phase-targeted aid policies
//!
//! Both targeted strategies share one mechanism: a priority phase whose
//! households are served first, with any spare capacity filled uniformly
//! from the rest of the population. They differ only in which phase they
//! prioritize.
//!
//! - **Target Phase 4** (`worst_first`): triage, assist the worst-off
//! - **Early Intervention** (`early_intervention`): assist Stressed
//!   households before they slide into crisis

use crate::models::{Phase, Population};
use crate::policy::{sample_without_replacement, AllocationPolicy, CapacityError};
use crate::rng::RngManager;

/// Aid allocation prioritizing one phase
///
/// Selection rules for capacity `c`:
/// - priority bucket holds at least `c` households → uniform sample of `c`
///   from the bucket;
/// - otherwise the whole bucket is selected and the shortfall is drawn
///   uniformly from all remaining households.
///
/// # Example
/// ```
/// use aid_simulator_core_rs::policy::{AllocationPolicy, TargetedPolicy};
/// use aid_simulator_core_rs::{Household, Phase, Population, RngManager};
///
/// let population = Population::new(vec![
///     Household::new(0, Phase::Emergency),
///     Household::new(1, Phase::Minimal),
///     Household::new(2, Phase::Emergency),
/// ]);
///
/// let policy = TargetedPolicy::worst_first();
/// let mut rng = RngManager::new(42);
/// let selected = policy.select(&population, 2, &mut rng).unwrap();
///
/// // Capacity fits inside the Emergency bucket, so only 0 and 2 qualify
/// assert!(selected.contains(&0) && selected.contains(&2));
/// ```
#[derive(Debug, Clone)]
pub struct TargetedPolicy {
    priority: Phase,
}

impl TargetedPolicy {
    /// Target the given phase first
    pub fn new(priority: Phase) -> Self {
        Self { priority }
    }

    /// Triage strategy: Emergency (phase 4) households first
    pub fn worst_first() -> Self {
        Self::new(Phase::Emergency)
    }

    /// Preventive strategy: Stressed (phase 2) households first
    pub fn early_intervention() -> Self {
        Self::new(Phase::Stressed)
    }

    /// The phase this policy serves first
    pub fn priority_phase(&self) -> Phase {
        self.priority
    }
}

impl AllocationPolicy for TargetedPolicy {
    fn select(
        &self,
        population: &Population,
        capacity: usize,
        rng: &mut RngManager,
    ) -> Result<Vec<usize>, CapacityError> {
        if capacity > population.len() {
            return Err(CapacityError {
                requested: capacity,
                available: population.len(),
            });
        }

        let priority_pool = population.indices_in_phase(self.priority);

        if priority_pool.len() >= capacity {
            // Bucket oversubscribed: uniform subsample within it
            return sample_without_replacement(priority_pool, capacity, rng);
        }

        // Whole bucket served; fill the shortfall from everyone else
        let mut selected = priority_pool;
        let shortfall = capacity - selected.len();

        let remainder: Vec<usize> = population
            .households()
            .iter()
            .enumerate()
            .filter(|(_, h)| h.phase() != self.priority)
            .map(|(i, _)| i)
            .collect();

        let fill = sample_without_replacement(remainder, shortfall, rng)?;
        selected.extend(fill);

        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Household;

    fn population_with(counts: [(Phase, usize); 4]) -> Population {
        let mut households = Vec::new();
        let mut id = 0u32;
        for (phase, count) in counts {
            for _ in 0..count {
                households.push(Household::new(id, phase));
                id += 1;
            }
        }
        Population::new(households)
    }

    #[test]
    fn test_oversubscribed_bucket_samples_within_it() {
        let population = population_with([
            (Phase::Minimal, 10),
            (Phase::Stressed, 10),
            (Phase::Crisis, 10),
            (Phase::Emergency, 30),
        ]);
        let policy = TargetedPolicy::worst_first();
        let mut rng = RngManager::new(42);

        let selected = policy.select(&population, 12, &mut rng).unwrap();
        assert_eq!(selected.len(), 12);
        for &index in &selected {
            assert_eq!(
                population.get(index).unwrap().phase(),
                Phase::Emergency,
                "selection left the priority bucket while it was oversubscribed"
            );
        }
    }

    #[test]
    fn test_shortfall_takes_whole_bucket_then_fills() {
        let population = population_with([
            (Phase::Minimal, 20),
            (Phase::Stressed, 20),
            (Phase::Crisis, 20),
            (Phase::Emergency, 5),
        ]);
        let policy = TargetedPolicy::worst_first();
        let mut rng = RngManager::new(42);

        let selected = policy.select(&population, 15, &mut rng).unwrap();
        assert_eq!(selected.len(), 15);

        let emergency_selected = selected
            .iter()
            .filter(|&&i| population.get(i).unwrap().phase() == Phase::Emergency)
            .count();
        assert_eq!(emergency_selected, 5, "every Emergency household is served");

        let mut sorted = selected.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 15, "fill drew a duplicate index");
    }

    #[test]
    fn test_early_intervention_prioritizes_stressed() {
        let population = population_with([
            (Phase::Minimal, 10),
            (Phase::Stressed, 8),
            (Phase::Crisis, 10),
            (Phase::Emergency, 10),
        ]);
        let policy = TargetedPolicy::early_intervention();
        assert_eq!(policy.priority_phase(), Phase::Stressed);

        let mut rng = RngManager::new(42);
        let selected = policy.select(&population, 10, &mut rng).unwrap();

        let stressed_selected = selected
            .iter()
            .filter(|&&i| population.get(i).unwrap().phase() == Phase::Stressed)
            .count();
        assert_eq!(stressed_selected, 8);
        assert_eq!(selected.len(), 10);
    }

    #[test]
    fn test_empty_priority_bucket_degrades_to_uniform_fill() {
        let population = population_with([
            (Phase::Minimal, 10),
            (Phase::Stressed, 0),
            (Phase::Crisis, 10),
            (Phase::Emergency, 0),
        ]);
        let policy = TargetedPolicy::worst_first();
        let mut rng = RngManager::new(42);

        let selected = policy.select(&population, 7, &mut rng).unwrap();
        assert_eq!(selected.len(), 7);
    }

    #[test]
    fn test_capacity_above_population_fails() {
        let population = population_with([
            (Phase::Minimal, 2),
            (Phase::Stressed, 2),
            (Phase::Crisis, 2),
            (Phase::Emergency, 2),
        ]);
        let policy = TargetedPolicy::worst_first();
        let mut rng = RngManager::new(42);

        let result = policy.select(&population, 9, &mut rng);
        assert_eq!(
            result,
            Err(CapacityError {
                requested: 9,
                available: 8
            })
        );
    }

    #[test]
    fn test_exact_bucket_size_serves_bucket_exactly() {
        let population = population_with([
            (Phase::Minimal, 5),
            (Phase::Stressed, 5),
            (Phase::Crisis, 5),
            (Phase::Emergency, 6),
        ]);
        let policy = TargetedPolicy::worst_first();
        let mut rng = RngManager::new(42);

        let mut selected = policy.select(&population, 6, &mut rng).unwrap();
        selected.sort_unstable();
        // Emergency households sit at indices 15..21
        assert_eq!(selected, (15..21).collect::<Vec<_>>());
    }

    #[test]
    fn test_selection_deterministic() {
        let population = population_with([
            (Phase::Minimal, 25),
            (Phase::Stressed, 25),
            (Phase::Crisis, 25),
            (Phase::Emergency, 25),
        ]);
        let policy = TargetedPolicy::early_intervention();

        let mut rng1 = RngManager::new(555);
        let mut rng2 = RngManager::new(555);
        assert_eq!(
            policy.select(&population, 40, &mut rng1).unwrap(),
            policy.select(&population, 40, &mut rng2).unwrap()
        );
    }
}
