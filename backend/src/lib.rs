//! Aid Targeting Simulator Core - Rust Engine
//!
//! Deterministic agent-based simulation of food insecurity dynamics over a
//! synthetic household population, for comparing aid-targeting strategies.
//!
//! # Architecture
//!
//! - **models**: Domain types (Phase, Household, Population)
//! - **generator**: Baseline phase distribution and population generation
//! - **policy**: Aid allocation strategies (equal, targeted)
//! - **dynamics**: Shock and recovery transition passes
//! - **orchestrator**: Main simulation loop, run history, digests
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. Household phase is always one of 1..=4 (enforced by the Phase type)
//! 2. All randomness is deterministic (seeded RNG, threaded explicitly)
//! 3. Population size is fixed for the lifetime of a run
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod dynamics;
pub mod generator;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod rng;

// Re-exports for convenience
pub use dynamics::{
    apply_recovery, apply_shock, RecoveryOutcome, RecoveryRates, ShockOutcome, ShockRates,
};
pub use generator::{BaselineDistribution, DistributionError, PopulationGenerator};
pub use models::{Household, Phase, PhaseCounts, PhaseError, Population};
pub use orchestrator::{
    config_digest, state_digest, ConfigError, PolicyConfig, RunHistory, RunSummary, Simulation,
    SimulationConfig, SimulationError, StepResult,
};
pub use policy::{
    allocate_aid, sample_without_replacement, AllocationPolicy, CapacityError,
    EqualDistributionPolicy, TargetedPolicy,
};
pub use rng::RngManager;

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn aid_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::simulation::PySimulation>()?;
    Ok(())
}
