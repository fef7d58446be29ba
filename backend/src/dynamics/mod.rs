//! Phase transition dynamics
//!
//! The two per-step passes that move households along the phase scale:
//! shock (worsening, everyone is exposed) and recovery (improvement, only
//! aided households). Both walk the population once in id order, decide each
//! household from the phase observed at its visit, and consume RNG draws
//! only for eligible households, so a transition can never cascade within a
//! single pass.

pub mod recovery;
pub mod shock;

pub use recovery::{apply_recovery, RecoveryOutcome, RecoveryRates};
pub use shock::{apply_shock, ShockOutcome, ShockRates};
