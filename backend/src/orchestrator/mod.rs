//! Orchestrator - main simulation loop
//!
//! Owns the population, strategy, RNG and history for one run and executes
//! the per-step cycle: shock → aid allocation → recovery → record.
//!
//! See `engine.rs` for the run loop and `digest.rs` for replay verification
//! hashes.

pub mod digest;
pub mod engine;

// Re-export main types for convenience
pub use digest::{config_digest, state_digest};
pub use engine::{
    ConfigError, PolicyConfig, RunHistory, RunSummary, Simulation, SimulationConfig,
    SimulationError, StepResult,
};
