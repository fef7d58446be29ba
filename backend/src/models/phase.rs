//! Food insecurity phase classification
//!
//! Households are classified on an IPC-style 1-4 scale. The phase is an
//! ordered enum rather than a raw integer so that "phase is always one of
//! 1..=4" holds by construction: invalid values are rejected at the
//! serialization boundary and cannot be represented in between.
//!
//! Phase ordering follows severity: `Minimal < Stressed < Crisis < Emergency`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when converting an out-of-range integer to a phase
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhaseError {
    #[error("invalid phase index {0}: must be in 1..=4")]
    InvalidIndex(u8),
}

/// Food insecurity phase of a single household
///
/// Serializes as its integer index (1..=4), so configs and snapshots read
/// naturally while deserialization still rejects anything outside the scale.
///
/// # Example
/// ```
/// use aid_simulator_core_rs::Phase;
///
/// let phase = Phase::Crisis;
/// assert_eq!(phase.index(), 3);
/// assert!(phase.is_critical());
/// assert!(Phase::Stressed < Phase::Emergency);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Phase {
    /// Phase 1: food secure
    Minimal = 1,
    /// Phase 2: at risk of sliding into crisis
    Stressed = 2,
    /// Phase 3: acute food insecurity
    Crisis = 3,
    /// Phase 4: severe, immediate intervention required
    Emergency = 4,
}

impl Phase {
    /// All phases in severity order (least to most severe)
    pub const ALL: [Phase; 4] = [
        Phase::Minimal,
        Phase::Stressed,
        Phase::Crisis,
        Phase::Emergency,
    ];

    /// Integer index on the 1..=4 scale
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Parse a 1..=4 index back into a phase
    ///
    /// # Example
    /// ```
    /// use aid_simulator_core_rs::Phase;
    ///
    /// assert_eq!(Phase::from_index(2), Some(Phase::Stressed));
    /// assert_eq!(Phase::from_index(5), None);
    /// ```
    pub fn from_index(index: u8) -> Option<Phase> {
        match index {
            1 => Some(Phase::Minimal),
            2 => Some(Phase::Stressed),
            3 => Some(Phase::Crisis),
            4 => Some(Phase::Emergency),
            _ => None,
        }
    }

    /// The next-worse phase, saturating at `Emergency`
    pub fn worsened(self) -> Phase {
        match self {
            Phase::Minimal => Phase::Stressed,
            Phase::Stressed => Phase::Crisis,
            Phase::Crisis => Phase::Emergency,
            Phase::Emergency => Phase::Emergency,
        }
    }

    /// The next-better phase, saturating at `Minimal`
    pub fn improved(self) -> Phase {
        match self {
            Phase::Minimal => Phase::Minimal,
            Phase::Stressed => Phase::Minimal,
            Phase::Crisis => Phase::Stressed,
            Phase::Emergency => Phase::Crisis,
        }
    }

    /// Whether the phase counts toward the critical share (phase 3 or worse)
    pub fn is_critical(self) -> bool {
        self >= Phase::Crisis
    }

    /// Human-readable phase name
    pub fn label(self) -> &'static str {
        match self {
            Phase::Minimal => "Minimal",
            Phase::Stressed => "Stressed",
            Phase::Crisis => "Crisis",
            Phase::Emergency => "Emergency",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label(), self.index())
    }
}

impl From<Phase> for u8 {
    fn from(phase: Phase) -> u8 {
        phase.index()
    }
}

impl TryFrom<u8> for Phase {
    type Error = PhaseError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Phase::from_index(index).ok_or(PhaseError::InvalidIndex(index))
    }
}
