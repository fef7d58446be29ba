//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, PyList).
//! The Python-facing config speaks the dashboard's vocabulary (`aid_percent`
//! in 0..100, strategy labels); conversion to core types happens here.

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::dynamics::{RecoveryRates, ShockRates};
use crate::models::PhaseCounts;
use crate::orchestrator::{PolicyConfig, RunSummary, SimulationConfig, StepResult};

// ========================================================================
// PyDict Extraction Helpers (DRY Pattern)
// ========================================================================

/// Extract a required field from a Python dict with clear error messages.
///
/// # Errors
/// Returns PyValueError if:
/// - Field is missing
/// - Type conversion fails
///
/// # Example
/// ```ignore
/// let value: usize = extract_required(&py_dict, "num_households")?;
/// ```
fn extract_required<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    dict.get_item(key)?
        .ok_or_else(|| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Missing required field '{}'",
                key
            ))
        })?
        .extract()
}

/// Extract a field with a default value if missing.
///
/// # Errors
/// Returns error only if type conversion fails (not if field is missing)
///
/// # Example
/// ```ignore
/// let aid_percent: f64 = extract_with_default(&py_dict, "aid_percent", 20.0)?;
/// ```
fn extract_with_default<'py, T>(dict: &Bound<'py, PyDict>, key: &str, default: T) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => value.extract(),
        None => Ok(default),
    }
}

/// Extract a required field that callers may spell several ways.
///
/// The first spelling is canonical and is the one named in the error when
/// every spelling is absent.
fn extract_required_aliased<'py, T>(dict: &Bound<'py, PyDict>, keys: &[&str]) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    for &key in keys {
        if let Some(value) = dict.get_item(key)? {
            return value.extract();
        }
    }
    Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
        "Missing required field '{}'",
        keys[0]
    )))
}

/// Extract an optional field that callers may spell several ways.
fn extract_with_default_aliased<'py, T>(
    dict: &Bound<'py, PyDict>,
    keys: &[&str],
    default: T,
) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    for &key in keys {
        if let Some(value) = dict.get_item(key)? {
            return value.extract();
        }
    }
    Ok(default)
}

// ========================================================================
// Configuration Parsers
// ========================================================================

/// Convert Python dict to SimulationConfig
///
/// Accepts the dashboard's parameter names: `aid_percent` on the 0..100
/// scale (converted to the core's fraction here), `shock_2_to_3` and
/// `shock_3_to_4` for the worsening probabilities, `steps` for the run
/// length. The short spellings the dashboard also uses (`N`, `shock_2to3`,
/// `shock_3to4`) are accepted as aliases. Missing optional fields fall back
/// to the dashboard defaults; `rng_seed` defaults to 42.
///
/// # Errors
///
/// Returns PyErr if:
/// - Required fields missing (`num_households`, `strategy`)
/// - Type conversions fail
/// - `aid_percent` outside [0, 100]
pub fn parse_simulation_config(py_config: &Bound<'_, PyDict>) -> PyResult<SimulationConfig> {
    // Extract required fields using helper
    let num_households: usize = extract_required_aliased(py_config, &["num_households", "N"])?;
    let rng_seed: u64 = extract_with_default(py_config, "rng_seed", 42)?;

    // aid_percent lives on the 0..100 scale at this boundary only
    let aid_percent: f64 = extract_with_default(py_config, "aid_percent", 20.0)?;
    if !(0.0..=100.0).contains(&aid_percent) {
        return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
            "aid_percent must be between 0 and 100, got {}",
            aid_percent
        )));
    }

    let shock_rates = ShockRates {
        stressed_to_crisis: extract_with_default_aliased(
            py_config,
            &["shock_2_to_3", "shock_2to3"],
            0.3,
        )?,
        crisis_to_emergency: extract_with_default_aliased(
            py_config,
            &["shock_3_to_4", "shock_3to4"],
            0.2,
        )?,
    };

    // Optional recovery overrides
    let recovery_rates = if let Some(py_recovery) = py_config.get_item("recovery_rates")? {
        let recovery_dict: Bound<'_, PyDict> = py_recovery.downcast_into()?;
        parse_recovery_rates(&recovery_dict)?
    } else {
        RecoveryRates::default()
    };

    let num_steps: usize = extract_with_default(py_config, "steps", 20)?;
    let policy = parse_strategy(py_config)?;

    Ok(SimulationConfig {
        num_households,
        aid_fraction: aid_percent / 100.0,
        shock_rates,
        recovery_rates,
        num_steps,
        policy,
        rng_seed,
    })
}

/// Parse the `strategy` field into a PolicyConfig
///
/// Accepts snake_case identifiers alongside the labels the dashboard
/// shows in its strategy selector.
fn parse_strategy(py_config: &Bound<'_, PyDict>) -> PyResult<PolicyConfig> {
    let strategy: String = extract_required(py_config, "strategy")?;

    match strategy.as_str() {
        "equal_distribution" | "EqualDistribution" | "Equal Distribution" => {
            Ok(PolicyConfig::EqualDistribution)
        }
        "target_phase4" | "TargetPhase4" | "Target Phase 4" => Ok(PolicyConfig::TargetPhase4),
        "early_intervention" | "EarlyIntervention" | "Early Intervention (Phase 2)" => {
            Ok(PolicyConfig::EarlyIntervention)
        }
        _ => Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
            "Invalid strategy: '{}'. Must be 'equal_distribution', 'target_phase4' or 'early_intervention'",
            strategy
        ))),
    }
}

/// Convert Python dict to RecoveryRates
fn parse_recovery_rates(py_recovery: &Bound<'_, PyDict>) -> PyResult<RecoveryRates> {
    Ok(RecoveryRates {
        emergency_to_crisis: py_recovery
            .get_item("emergency_to_crisis")?
            .map(|v| v.extract())
            .transpose()?
            .unwrap_or(0.6),

        crisis_to_stressed: py_recovery
            .get_item("crisis_to_stressed")?
            .map(|v| v.extract())
            .transpose()?
            .unwrap_or(0.5),

        stressed_to_minimal: py_recovery
            .get_item("stressed_to_minimal")?
            .map(|v| v.extract())
            .transpose()?
            .unwrap_or(0.4),
    })
}

// ========================================================================
// Result Converters
// ========================================================================

/// Convert PhaseCounts to Python dict keyed by integer phase (1..=4)
///
/// All four phases are always present, including zero counts, so Python
/// callers can index the dict without membership checks.
pub fn phase_counts_to_py(py: Python, counts: &PhaseCounts) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    for (phase, count) in counts.iter() {
        dict.set_item(phase.index(), count)?;
    }

    Ok(dict.into())
}

/// Convert StepResult to Python dict
pub fn step_result_to_py(py: Python, result: &StepResult) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    dict.set_item("step", result.step)?;
    dict.set_item("shocked", result.shocked)?;
    dict.set_item("aided", result.aided)?;
    dict.set_item("recovered", result.recovered)?;
    dict.set_item("critical_fraction", result.critical_fraction)?;

    Ok(dict.into())
}

/// Convert RunSummary to Python dict
///
/// `history` is the phase-3-or-worse share after each completed step,
/// oldest first. This is the series the dashboard plots.
pub fn run_summary_to_py(py: Python, summary: &RunSummary) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    dict.set_item("run_id", &summary.run_id)?;
    dict.set_item("seed", summary.seed)?;
    dict.set_item("final_counts", phase_counts_to_py(py, &summary.final_counts)?)?;

    let history = PyList::empty(py);
    for fraction in summary.history.critical_series() {
        history.append(fraction)?;
    }
    dict.set_item("history", history)?;

    dict.set_item("final_critical_fraction", summary.final_critical_fraction())?;

    Ok(dict.into())
}
