//! Population container and phase tallies
//!
//! `Population` owns the full household vector for a run; components borrow
//! it mutably one at a time (shock, allocation, recovery), so there is no
//! shared-state concurrency to reason about. `PhaseCounts` is the aggregate
//! view: a count for every phase, always including phases with zero
//! households so downstream consumers never see a partial distribution.

use serde::{Deserialize, Serialize};

use crate::models::{Household, Phase};

/// Household counts per phase
///
/// All four phases are always present; a phase nobody occupies reports 0
/// rather than being omitted.
///
/// # Example
/// ```
/// use aid_simulator_core_rs::{Phase, PhaseCounts};
///
/// let mut counts = PhaseCounts::default();
/// counts.increment(Phase::Crisis);
/// counts.increment(Phase::Crisis);
/// counts.increment(Phase::Minimal);
///
/// assert_eq!(counts.get(Phase::Crisis), 2);
/// assert_eq!(counts.get(Phase::Emergency), 0);
/// assert_eq!(counts.total(), 3);
/// assert_eq!(counts.critical_count(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCounts {
    pub minimal: usize,
    pub stressed: usize,
    pub crisis: usize,
    pub emergency: usize,
}

impl PhaseCounts {
    /// Count for a single phase
    pub fn get(&self, phase: Phase) -> usize {
        match phase {
            Phase::Minimal => self.minimal,
            Phase::Stressed => self.stressed,
            Phase::Crisis => self.crisis,
            Phase::Emergency => self.emergency,
        }
    }

    /// Add one household to a phase's tally
    pub fn increment(&mut self, phase: Phase) {
        match phase {
            Phase::Minimal => self.minimal += 1,
            Phase::Stressed => self.stressed += 1,
            Phase::Crisis => self.crisis += 1,
            Phase::Emergency => self.emergency += 1,
        }
    }

    /// Total households across all phases
    pub fn total(&self) -> usize {
        self.minimal + self.stressed + self.crisis + self.emergency
    }

    /// Households in phase 3 or worse
    pub fn critical_count(&self) -> usize {
        self.crisis + self.emergency
    }

    /// Iterate `(phase, count)` pairs in severity order
    pub fn iter(&self) -> impl Iterator<Item = (Phase, usize)> + '_ {
        Phase::ALL.iter().map(move |&phase| (phase, self.get(phase)))
    }
}

/// The full household population for one simulation run
///
/// Order is fixed at generation time and meaningful: transition passes walk
/// households in id order, so the order is part of the deterministic replay
/// contract.
///
/// # Example
/// ```
/// use aid_simulator_core_rs::{Household, Phase, Population};
///
/// let population = Population::new(vec![
///     Household::new(0, Phase::Minimal),
///     Household::new(1, Phase::Crisis),
/// ]);
///
/// assert_eq!(population.len(), 2);
/// assert_eq!(population.critical_count(), 1);
/// assert_eq!(population.critical_fraction(), 0.5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Population {
    households: Vec<Household>,
}

impl Population {
    /// Wrap a household vector
    ///
    /// Ids are expected to match positions; the generator produces
    /// households that way.
    pub fn new(households: Vec<Household>) -> Self {
        debug_assert!(households
            .iter()
            .enumerate()
            .all(|(i, h)| h.id() as usize == i));
        Self { households }
    }

    /// Number of households
    pub fn len(&self) -> usize {
        self.households.len()
    }

    /// Whether the population is empty
    pub fn is_empty(&self) -> bool {
        self.households.is_empty()
    }

    /// Read-only view of all households in id order
    pub fn households(&self) -> &[Household] {
        &self.households
    }

    /// Mutable view of all households in id order
    pub fn households_mut(&mut self) -> &mut [Household] {
        &mut self.households
    }

    /// Household at a position
    pub fn get(&self, index: usize) -> Option<&Household> {
        self.households.get(index)
    }

    /// Mutable household at a position
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Household> {
        self.households.get_mut(index)
    }

    /// Tally households per phase (every phase present)
    pub fn phase_counts(&self) -> PhaseCounts {
        let mut counts = PhaseCounts::default();
        for household in &self.households {
            counts.increment(household.phase());
        }
        counts
    }

    /// Households in phase 3 or worse
    pub fn critical_count(&self) -> usize {
        self.households.iter().filter(|h| h.is_critical()).count()
    }

    /// Share of households in phase 3 or worse
    ///
    /// Returns 0.0 for an empty population.
    pub fn critical_fraction(&self) -> f64 {
        if self.households.is_empty() {
            return 0.0;
        }
        self.critical_count() as f64 / self.households.len() as f64
    }

    /// Households currently flagged as aided
    pub fn aided_count(&self) -> usize {
        self.households.iter().filter(|h| h.received_aid()).count()
    }

    /// Positions of all households currently in `phase`, in id order
    pub fn indices_in_phase(&self, phase: Phase) -> Vec<usize> {
        self.households
            .iter()
            .enumerate()
            .filter(|(_, h)| h.phase() == phase)
            .map(|(i, _)| i)
            .collect()
    }

    /// Clear every household's aid flag
    ///
    /// Run at the start of each allocation so aid never carries across steps.
    pub fn reset_aid_flags(&mut self) {
        for household in &mut self.households {
            household.set_received_aid(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_population() -> Population {
        Population::new(vec![
            Household::new(0, Phase::Minimal),
            Household::new(1, Phase::Stressed),
            Household::new(2, Phase::Crisis),
            Household::new(3, Phase::Emergency),
            Household::new(4, Phase::Crisis),
        ])
    }

    #[test]
    fn test_phase_counts_cover_all_phases() {
        let counts = sample_population().phase_counts();

        assert_eq!(counts.get(Phase::Minimal), 1);
        assert_eq!(counts.get(Phase::Stressed), 1);
        assert_eq!(counts.get(Phase::Crisis), 2);
        assert_eq!(counts.get(Phase::Emergency), 1);
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn test_phase_counts_report_zero_for_empty_phase() {
        let population = Population::new(vec![
            Household::new(0, Phase::Minimal),
            Household::new(1, Phase::Minimal),
        ]);
        let counts = population.phase_counts();

        assert_eq!(counts.get(Phase::Emergency), 0);
        assert_eq!(counts.critical_count(), 0);
    }

    #[test]
    fn test_critical_fraction() {
        let population = sample_population();
        assert_eq!(population.critical_count(), 3);
        assert!((population.critical_fraction() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_critical_fraction_empty_population() {
        let population = Population::new(Vec::new());
        assert_eq!(population.critical_fraction(), 0.0);
    }

    #[test]
    fn test_indices_in_phase() {
        let population = sample_population();
        assert_eq!(population.indices_in_phase(Phase::Crisis), vec![2, 4]);
        assert!(population.indices_in_phase(Phase::Minimal).contains(&0));
    }

    #[test]
    fn test_reset_aid_flags() {
        let mut population = sample_population();
        population.get_mut(1).unwrap().set_received_aid(true);
        population.get_mut(3).unwrap().set_received_aid(true);
        assert_eq!(population.aided_count(), 2);

        population.reset_aid_flags();
        assert_eq!(population.aided_count(), 0);
    }

    #[test]
    fn test_counts_iter_in_severity_order() {
        let counts = sample_population().phase_counts();
        let phases: Vec<Phase> = counts.iter().map(|(p, _)| p).collect();
        assert_eq!(phases, Phase::ALL.to_vec());
    }
}
