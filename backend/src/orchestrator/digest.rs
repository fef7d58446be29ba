//! Run digests for replay verification
//!
//! Determinism is the simulator's core contract: same seed + same config
//! must reproduce a run exactly. These digests make that checkable from the
//! outside. A config digest fingerprints the inputs; a state digest
//! fingerprints the full mutable state (step counter, RNG state, every
//! household) at a step boundary, so two runs can be compared without
//! shipping whole populations around.
//!
//! Hashing uses canonical JSON (object keys sorted recursively) so the
//! digest is stable regardless of serializer map ordering.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::models::Household;
use crate::orchestrator::engine::{Simulation, SimulationConfig, SimulationError};

/// Serialize to canonical JSON with recursively sorted object keys
fn canonical_json<T: Serialize>(value: &T) -> Result<String, SimulationError> {
    let value =
        serde_json::to_value(value).map_err(|e| SimulationError::Serialization(e.to_string()))?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    serde_json::to_string(&canonicalize(value))
        .map_err(|e| SimulationError::Serialization(e.to_string()))
}

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// SHA-256 digest of a simulation configuration
///
/// Two configs with equal field values produce equal digests; any field
/// change (seed included) produces a different digest.
pub fn config_digest(config: &SimulationConfig) -> Result<String, SimulationError> {
    Ok(sha256_hex(&canonical_json(config)?))
}

/// The state a digest covers: everything that varies over a run
#[derive(Serialize)]
struct StateView<'a> {
    step: usize,
    rng_state: u64,
    households: &'a [Household],
}

/// SHA-256 digest of a simulation's current state
///
/// Covers the step counter, the RNG state and every household (phase and
/// aid flag), so two runs from the same config agree on this digest at
/// every step boundary, and any divergence shows up immediately.
pub fn state_digest(simulation: &Simulation) -> Result<String, SimulationError> {
    let view = StateView {
        step: simulation.current_step(),
        rng_state: simulation.rng_state(),
        households: simulation.population().households(),
    };
    Ok(sha256_hex(&canonical_json(&view)?))
}
