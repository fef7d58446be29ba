//! Simulation Engine
//!
//! Main simulation loop integrating all components:
//! - Population generation (baseline phase distribution)
//! - Shock pass (households slide toward crisis)
//! - Aid allocation (strategy selects capacity households)
//! - Recovery pass (aided households improve)
//! - History recording (critical-share trajectory)
//!
//! # Architecture
//!
//! The `Simulation` executes a bounded run of `num_steps` steps:
//!
//! ```text
//! For each step k:
//! 1. Shock pass over the full population
//! 2. Allocate aid (reset flags, select floor(aid_fraction × N), mark)
//! 3. Recovery pass over aided households
//! 4. Record StepResult and advance
//! ```
//!
//! Everything is deterministic given the config: a single RNG is seeded once
//! and threaded through generation, allocation and both transition passes in
//! a fixed order.
//!
//! # Example
//!
//! ```rust
//! use aid_simulator_core_rs::orchestrator::{PolicyConfig, Simulation, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     num_households: 200,
//!     aid_fraction: 0.2,
//!     num_steps: 10,
//!     policy: PolicyConfig::TargetPhase4,
//!     rng_seed: 42,
//!     ..Default::default()
//! };
//!
//! let mut simulation = Simulation::new(config).unwrap();
//! let summary = simulation.run().unwrap();
//!
//! assert_eq!(summary.history.len(), 10);
//! assert_eq!(summary.final_counts.total(), 200);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::dynamics::{apply_recovery, apply_shock, RecoveryRates, ShockRates};
use crate::generator::{BaselineDistribution, PopulationGenerator};
use crate::models::{PhaseCounts, Population};
use crate::policy::{
    allocate_aid, AllocationPolicy, CapacityError, EqualDistributionPolicy, TargetedPolicy,
};
use crate::rng::RngManager;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete simulation configuration
///
/// Created once per run and immutable afterwards. Validation happens in
/// [`Simulation::new`] before any simulation work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of households to generate (> 0)
    pub num_households: usize,

    /// Share of the population assisted per step, in [0.0, 1.0]
    ///
    /// Aid capacity is `floor(aid_fraction × num_households)` households,
    /// fixed for the whole run.
    pub aid_fraction: f64,

    /// Worsening probabilities for the shock pass
    pub shock_rates: ShockRates,

    /// Improvement probabilities for the recovery pass
    pub recovery_rates: RecoveryRates,

    /// Number of steps to simulate (> 0)
    pub num_steps: usize,

    /// Aid allocation strategy
    pub policy: PolicyConfig,

    /// RNG seed for deterministic simulation
    pub rng_seed: u64,
}

impl Default for SimulationConfig {
    /// The canonical dashboard scenario: 5000 households, 20% aid capacity,
    /// default shock and recovery rates, 20 steps, equal distribution
    fn default() -> Self {
        Self {
            num_households: 5000,
            aid_fraction: 0.20,
            shock_rates: ShockRates::default(),
            recovery_rates: RecoveryRates::default(),
            num_steps: 20,
            policy: PolicyConfig::EqualDistribution,
            rng_seed: 42,
        }
    }
}

/// Aid strategy selection
///
/// Determines which [`AllocationPolicy`] the simulation builds at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyConfig {
    /// Uniform random selection across the whole population (baseline)
    EqualDistribution,

    /// Emergency (phase 4) households first, shortfall filled from the rest
    TargetPhase4,

    /// Stressed (phase 2) households first, shortfall filled from the rest
    EarlyIntervention,
}

// ============================================================================
// Errors
// ============================================================================

/// Configuration validation errors
///
/// One variant per validation rule, so callers can report exactly which
/// field was rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("num_households must be > 0")]
    PopulationEmpty,

    #[error("aid_fraction {0} outside [0.0, 1.0]")]
    AidFractionOutOfRange(f64),

    #[error("{name} is {value}, must be a probability in [0.0, 1.0]")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("num_steps must be > 0")]
    StepsZero,
}

/// Simulation error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// Configuration validation failed
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Aid allocation could not satisfy the configured capacity
    #[error("aid allocation failed: {0}")]
    Capacity(#[from] CapacityError),

    /// `step()` called after the configured run length was reached
    #[error("run already complete after {num_steps} steps")]
    RunComplete { num_steps: usize },

    /// State or config serialization failed (digests)
    #[error("serialization failed: {0}")]
    Serialization(String),
}

// ============================================================================
// Step Results and History
// ============================================================================

/// Result of a single simulation step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// Step number (0-based)
    pub step: usize,

    /// Households that worsened in the shock pass
    pub shocked: usize,

    /// Households selected for aid (always the configured capacity)
    pub aided: usize,

    /// Households that improved in the recovery pass
    pub recovered: usize,

    /// Share of households in phase 3 or worse, measured after recovery
    pub critical_fraction: f64,
}

/// Ordered record of every completed step
///
/// Length equals the number of steps executed so far; the critical-share
/// trajectory is the primary output of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunHistory {
    steps: Vec<StepResult>,
}

impl RunHistory {
    /// Empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps recorded so far
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether any step has completed
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// All recorded step results, oldest first
    pub fn steps(&self) -> &[StepResult] {
        &self.steps
    }

    /// The most recently completed step
    pub fn latest(&self) -> Option<&StepResult> {
        self.steps.last()
    }

    /// The critical-share value per step, oldest first
    pub fn critical_series(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.critical_fraction).collect()
    }

    pub(crate) fn record(&mut self, result: StepResult) {
        self.steps.push(result);
    }
}

/// Final outcome of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique identifier of the run that produced this summary
    pub run_id: String,

    /// Seed the run was executed with
    pub seed: u64,

    /// Final household counts, all four phases present
    pub final_counts: PhaseCounts,

    /// Per-step history of the whole run
    pub history: RunHistory,
}

impl RunSummary {
    /// Critical share after the final step
    pub fn final_critical_fraction(&self) -> f64 {
        self.history
            .latest()
            .map(|s| s.critical_fraction)
            .unwrap_or(0.0)
    }
}

// ============================================================================
// Simulation
// ============================================================================

/// Main simulation engine
///
/// Owns all run state and coordinates the step cycle. Constructing a
/// `Simulation` validates the config, generates the initial population and
/// builds the strategy object; afterwards [`step`](Simulation::step) and
/// [`run`](Simulation::run) drive the model.
///
/// # Determinism
///
/// All randomness flows through one seeded xorshift64* RNG in a fixed call
/// order. Same config (seed included) = identical populations, transitions
/// and history.
pub struct Simulation {
    /// Immutable run configuration
    config: SimulationConfig,

    /// Unique id tagging this run's outputs
    run_id: String,

    /// The households being simulated
    population: Population,

    /// Aid strategy built from `config.policy`
    policy: Box<dyn AllocationPolicy>,

    /// Deterministic RNG
    rng: RngManager,

    /// Completed step results
    history: RunHistory,

    /// Steps executed so far
    current_step: usize,

    /// Households assisted per step: floor(aid_fraction × num_households)
    capacity: usize,
}

impl std::fmt::Debug for Simulation {
    // Manual impl: `policy` is a `Box<dyn AllocationPolicy>` and has no Debug
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("config", &self.config)
            .field("run_id", &self.run_id)
            .field("population", &self.population)
            .field("rng", &self.rng)
            .field("history", &self.history)
            .field("current_step", &self.current_step)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Create a new simulation from configuration
    ///
    /// Validates the config, seeds the RNG, generates the baseline
    /// population and instantiates the strategy.
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidConfig`] when any field fails validation;
    /// nothing is generated in that case.
    ///
    /// # Example
    ///
    /// ```rust
    /// use aid_simulator_core_rs::orchestrator::{PolicyConfig, Simulation, SimulationConfig};
    ///
    /// let config = SimulationConfig {
    ///     num_households: 1000,
    ///     aid_fraction: 0.15,
    ///     policy: PolicyConfig::EarlyIntervention,
    ///     rng_seed: 7,
    ///     ..Default::default()
    /// };
    ///
    /// let simulation = Simulation::new(config).unwrap();
    /// assert_eq!(simulation.population().len(), 1000);
    /// assert_eq!(simulation.aid_capacity(), 150);
    /// ```
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let mut rng = RngManager::new(config.rng_seed);

        let generator = PopulationGenerator::new(BaselineDistribution::default());
        let population = generator.generate(config.num_households, &mut rng);

        let policy: Box<dyn AllocationPolicy> = match config.policy {
            PolicyConfig::EqualDistribution => Box::new(EqualDistributionPolicy::new()),
            PolicyConfig::TargetPhase4 => Box::new(TargetedPolicy::worst_first()),
            PolicyConfig::EarlyIntervention => Box::new(TargetedPolicy::early_intervention()),
        };

        let capacity = (config.aid_fraction * config.num_households as f64).floor() as usize;

        Ok(Self {
            run_id: Uuid::new_v4().to_string(),
            population,
            policy,
            rng,
            history: RunHistory::new(),
            current_step: 0,
            capacity,
            config,
        })
    }

    /// Validate configuration
    fn validate_config(config: &SimulationConfig) -> Result<(), ConfigError> {
        if config.num_households == 0 {
            return Err(ConfigError::PopulationEmpty);
        }

        if !(0.0..=1.0).contains(&config.aid_fraction) {
            return Err(ConfigError::AidFractionOutOfRange(config.aid_fraction));
        }

        Self::check_probability(
            "shock_rates.stressed_to_crisis",
            config.shock_rates.stressed_to_crisis,
        )?;
        Self::check_probability(
            "shock_rates.crisis_to_emergency",
            config.shock_rates.crisis_to_emergency,
        )?;
        Self::check_probability(
            "recovery_rates.emergency_to_crisis",
            config.recovery_rates.emergency_to_crisis,
        )?;
        Self::check_probability(
            "recovery_rates.crisis_to_stressed",
            config.recovery_rates.crisis_to_stressed,
        )?;
        Self::check_probability(
            "recovery_rates.stressed_to_minimal",
            config.recovery_rates.stressed_to_minimal,
        )?;

        if config.num_steps == 0 {
            return Err(ConfigError::StepsZero);
        }

        Ok(())
    }

    fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
        // NaN fails the range check too
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::ProbabilityOutOfRange { name, value });
        }
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Unique id of this run
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// The configuration the run was built from
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current population state
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// History of completed steps
    pub fn history(&self) -> &RunHistory {
        &self.history
    }

    /// Steps executed so far
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Configured run length
    pub fn num_steps(&self) -> usize {
        self.config.num_steps
    }

    /// Whether all configured steps have run
    pub fn is_complete(&self) -> bool {
        self.current_step >= self.config.num_steps
    }

    /// Households assisted per step
    pub fn aid_capacity(&self) -> usize {
        self.capacity
    }

    /// Current RNG state (for digests/replay checks)
    pub fn rng_state(&self) -> u64 {
        self.rng.get_state()
    }

    // ========================================================================
    // Step Loop
    // ========================================================================

    /// Execute one simulation step
    ///
    /// Runs the full cycle: shock pass, aid allocation, recovery pass, then
    /// records the step. The step counter only advances on success.
    ///
    /// # Errors
    ///
    /// * [`SimulationError::RunComplete`] once `num_steps` steps have run
    /// * [`SimulationError::Capacity`] when the strategy cannot fill the
    ///   configured capacity; the run is aborted and the failed step is not
    ///   recorded
    pub fn step(&mut self) -> Result<StepResult, SimulationError> {
        if self.is_complete() {
            return Err(SimulationError::RunComplete {
                num_steps: self.config.num_steps,
            });
        }

        // STEP 1: SHOCK
        let shock = apply_shock(&mut self.population, &self.config.shock_rates, &mut self.rng);

        // STEP 2: AID ALLOCATION
        let selected = allocate_aid(
            &mut self.population,
            self.policy.as_ref(),
            self.capacity,
            &mut self.rng,
        )?;

        // STEP 3: RECOVERY
        let recovery = apply_recovery(
            &mut self.population,
            &self.config.recovery_rates,
            &mut self.rng,
        );

        // STEP 4: RECORD
        let result = StepResult {
            step: self.current_step,
            shocked: shock.total(),
            aided: selected.len(),
            recovered: recovery.total(),
            critical_fraction: self.population.critical_fraction(),
        };
        self.history.record(result);
        self.current_step += 1;

        Ok(result)
    }

    /// Run every remaining step and return the final summary
    ///
    /// # Errors
    ///
    /// The first step error aborts the run; no summary is returned.
    pub fn run(&mut self) -> Result<RunSummary, SimulationError> {
        while !self.is_complete() {
            self.step()?;
        }
        Ok(self.summary())
    }

    /// Summary of the run as it stands
    ///
    /// Usually read after [`run`](Simulation::run); when stepping manually
    /// it reflects the steps completed so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            run_id: self.run_id.clone(),
            seed: self.config.rng_seed,
            final_counts: self.population.phase_counts(),
            history: self.history.clone(),
        }
    }
}
