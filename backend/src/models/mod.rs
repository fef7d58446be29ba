//! Domain models for the aid targeting simulator

pub mod household;
pub mod phase;
pub mod population;

// Re-exports
pub use household::Household;
pub use phase::{Phase, PhaseError};
pub use population::{PhaseCounts, Population};
