//! Aid Allocation Policy Module
//!
//! Defines the strategy interface for deciding which households receive aid
//! each step, given a fixed capacity.
//!
//! # Overview
//!
//! Every step the simulation can assist `capacity = floor(aid_fraction × N)`
//! households. A policy is a pure selector: given the population as it stands
//! after the shock pass, it returns the indices of exactly `capacity`
//! distinct households. Applying the selection (clearing old flags, marking
//! the chosen households) is the orchestrator's job, bundled here in
//! [`allocate_aid`] so no caller can forget the reset.
//!
//! # Policy Interface
//!
//! All strategies implement the [`AllocationPolicy`] trait:
//! ```rust
//! use aid_simulator_core_rs::policy::{AllocationPolicy, CapacityError};
//! use aid_simulator_core_rs::{Population, RngManager};
//!
//! struct FirstComersPolicy;
//!
//! impl AllocationPolicy for FirstComersPolicy {
//!     fn select(
//!         &self,
//!         population: &Population,
//!         capacity: usize,
//!         _rng: &mut RngManager,
//!     ) -> Result<Vec<usize>, CapacityError> {
//!         if capacity > population.len() {
//!             return Err(CapacityError {
//!                 requested: capacity,
//!                 available: population.len(),
//!             });
//!         }
//!         Ok((0..capacity).collect())
//!     }
//! }
//! ```
//!
//! # Available strategies
//!
//! 1. **EqualDistribution**: uniform sample across the whole population
//! 2. **TargetPhase4** (`TargetedPolicy::worst_first`): Emergency households
//!    first, shortfall filled from everyone else
//! 3. **EarlyIntervention** (`TargetedPolicy::early_intervention`): Stressed
//!    households first, same shortfall rule
//!
//! Strategies are loaded via the `PolicyConfig` enum on the simulation
//! config; see the orchestrator module.

use thiserror::Error;

use crate::models::Population;
use crate::rng::RngManager;

pub mod equal;
pub mod targeted;

pub use equal::EqualDistributionPolicy;
pub use targeted::TargetedPolicy;

/// Error raised when a selection asks for more households than exist
///
/// Capacity is never silently clamped: a configuration whose capacity
/// exceeds the selectable pool is reported loudly and the step aborts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("aid capacity {requested} exceeds the {available} selectable households")]
pub struct CapacityError {
    /// Households the caller asked for
    pub requested: usize,
    /// Households actually available to choose from
    pub available: usize,
}

/// Aid allocation strategy
///
/// Implementations are stateless selectors; all randomness comes from the
/// explicitly passed RNG so runs stay reproducible.
pub trait AllocationPolicy: Send + Sync {
    /// Choose exactly `capacity` distinct household indices
    ///
    /// Called once per step, after the shock pass. The returned indices are
    /// positions into `population` in selection order.
    ///
    /// # Errors
    ///
    /// [`CapacityError`] when `capacity` exceeds the selectable pool.
    fn select(
        &self,
        population: &Population,
        capacity: usize,
        rng: &mut RngManager,
    ) -> Result<Vec<usize>, CapacityError>;
}

/// Run one full allocation: reset flags, select, mark
///
/// Clears every household's aid flag, asks the policy for its selection and
/// marks the chosen households. Returns the selected indices.
///
/// # Errors
///
/// Propagates the policy's [`CapacityError`]; in that case no household
/// keeps an aid flag from a previous step (the reset has already happened).
pub fn allocate_aid(
    population: &mut Population,
    policy: &dyn AllocationPolicy,
    capacity: usize,
    rng: &mut RngManager,
) -> Result<Vec<usize>, CapacityError> {
    population.reset_aid_flags();

    let selected = policy.select(population, capacity, rng)?;
    debug_assert_eq!(selected.len(), capacity);

    let households = population.households_mut();
    for &index in &selected {
        households[index].set_received_aid(true);
    }

    Ok(selected)
}

/// Draw `count` distinct entries from `pool` uniformly at random
///
/// Partial Fisher-Yates over the pool vector: after `count` swap steps the
/// prefix holds the sample. Consumes exactly `count` RNG draws.
///
/// # Errors
///
/// [`CapacityError`] when `count` exceeds the pool size.
///
/// # Example
/// ```
/// use aid_simulator_core_rs::policy::sample_without_replacement;
/// use aid_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(42);
/// let sample = sample_without_replacement((0..10).collect(), 3, &mut rng).unwrap();
/// assert_eq!(sample.len(), 3);
/// ```
pub fn sample_without_replacement(
    mut pool: Vec<usize>,
    count: usize,
    rng: &mut RngManager,
) -> Result<Vec<usize>, CapacityError> {
    if count > pool.len() {
        return Err(CapacityError {
            requested: count,
            available: pool.len(),
        });
    }

    for i in 0..count {
        let j = rng.range(i as i64, pool.len() as i64) as usize;
        pool.swap(i, j);
    }
    pool.truncate(count);

    Ok(pool)
}
