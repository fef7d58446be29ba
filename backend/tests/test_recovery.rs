//! Integration tests for the recovery pass
//!
//! Only households holding aid this step can improve, and never by more
//! than one phase per pass.

use aid_simulator_core_rs::{
    apply_recovery, Household, Phase, Population, RecoveryRates, RngManager,
};

fn certain_rates() -> RecoveryRates {
    RecoveryRates {
        emergency_to_crisis: 1.0,
        crisis_to_stressed: 1.0,
        stressed_to_minimal: 1.0,
    }
}

/// Population where household i is aided iff `aided[i]`
fn population_with_aid(phases: &[Phase], aided: &[bool]) -> Population {
    let mut population = Population::new(
        phases
            .iter()
            .enumerate()
            .map(|(i, &p)| Household::new(i as u32, p))
            .collect(),
    );
    for (index, &flag) in aided.iter().enumerate() {
        if flag {
            if let Some(household) = population.get_mut(index) {
                household.set_received_aid(true);
            }
        }
    }
    population
}

#[test]
fn test_only_aided_households_improve() {
    let phases = vec![Phase::Crisis; 10];
    let aided: Vec<bool> = (0..10).map(|i| i % 2 == 0).collect();
    let mut population = population_with_aid(&phases, &aided);
    let mut rng = RngManager::new(42);

    let outcome = apply_recovery(&mut population, &certain_rates(), &mut rng);

    assert_eq!(outcome.crisis_to_stressed, 5);
    for (index, household) in population.households().iter().enumerate() {
        let expected = if aided[index] {
            Phase::Stressed
        } else {
            Phase::Crisis
        };
        assert_eq!(household.phase(), expected, "household {}", index);
    }
}

#[test]
fn test_certain_recovery_improves_one_level_only() {
    let phases = [Phase::Emergency, Phase::Crisis, Phase::Stressed, Phase::Minimal];
    let aided = [true, true, true, true];
    let mut population = population_with_aid(&phases, &aided);
    let mut rng = RngManager::new(42);

    let outcome = apply_recovery(&mut population, &certain_rates(), &mut rng);

    assert_eq!(population.get(0).unwrap().phase(), Phase::Crisis);
    assert_eq!(population.get(1).unwrap().phase(), Phase::Stressed);
    assert_eq!(population.get(2).unwrap().phase(), Phase::Minimal);
    // Minimal has nothing to improve to
    assert_eq!(population.get(3).unwrap().phase(), Phase::Minimal);

    assert_eq!(outcome.total(), 3);
}

#[test]
fn test_repeated_passes_climb_one_phase_at_a_time() {
    let phases = vec![Phase::Emergency; 20];
    let aided = vec![true; 20];
    let mut population = population_with_aid(&phases, &aided);
    let mut rng = RngManager::new(42);

    apply_recovery(&mut population, &certain_rates(), &mut rng);
    assert_eq!(population.phase_counts().crisis, 20);

    apply_recovery(&mut population, &certain_rates(), &mut rng);
    assert_eq!(population.phase_counts().stressed, 20);
}

#[test]
fn test_recovery_rate_empirically_honored() {
    let phases = vec![Phase::Crisis; 10_000];
    let aided = vec![true; 10_000];
    let mut population = population_with_aid(&phases, &aided);
    let rates = RecoveryRates {
        emergency_to_crisis: 0.0,
        crisis_to_stressed: 0.5,
        stressed_to_minimal: 0.0,
    };
    let mut rng = RngManager::new(42);

    let outcome = apply_recovery(&mut population, &rates, &mut rng);

    let observed = outcome.crisis_to_stressed as f64 / 10_000.0;
    assert!(
        (observed - 0.5).abs() < 0.02,
        "observed recovery rate {:.4} too far from 0.5",
        observed
    );
}

#[test]
fn test_unaided_households_consume_no_draws() {
    let phases = vec![Phase::Crisis; 100];
    let aided = vec![false; 100];
    let mut population = population_with_aid(&phases, &aided);
    let mut rng = RngManager::new(42);
    let state_before = rng.get_state();

    let outcome = apply_recovery(&mut population, &RecoveryRates::default(), &mut rng);

    assert_eq!(outcome.total(), 0);
    assert_eq!(rng.get_state(), state_before);
}

#[test]
fn test_aided_minimal_households_consume_no_draws() {
    let phases = vec![Phase::Minimal; 50];
    let aided = vec![true; 50];
    let mut population = population_with_aid(&phases, &aided);
    let mut rng = RngManager::new(42);
    let state_before = rng.get_state();

    apply_recovery(&mut population, &certain_rates(), &mut rng);

    assert_eq!(rng.get_state(), state_before);
    assert_eq!(population.phase_counts().minimal, 50);
}

#[test]
fn test_recovery_never_worsens() {
    let phases: Vec<Phase> = (0..300).map(|i| Phase::ALL[i % 4]).collect();
    let aided: Vec<bool> = (0..300).map(|i| i % 3 != 0).collect();
    let mut population = population_with_aid(&phases, &aided);
    let mut rng = RngManager::new(99);

    apply_recovery(&mut population, &RecoveryRates::default(), &mut rng);

    for (household, &before) in population.households().iter().zip(phases.iter()) {
        assert!(
            household.phase() <= before,
            "household {} worsened during recovery",
            household.id()
        );
    }
}

#[test]
fn test_zero_rates_leave_population_untouched() {
    let phases: Vec<Phase> = (0..100).map(|i| Phase::ALL[i % 4]).collect();
    let aided = vec![true; 100];
    let mut population = population_with_aid(&phases, &aided);
    let rates = RecoveryRates {
        emergency_to_crisis: 0.0,
        crisis_to_stressed: 0.0,
        stressed_to_minimal: 0.0,
    };
    let mut rng = RngManager::new(42);

    let outcome = apply_recovery(&mut population, &rates, &mut rng);

    assert_eq!(outcome.total(), 0);
    for (household, &before) in population.households().iter().zip(phases.iter()) {
        assert_eq!(household.phase(), before);
    }
}
