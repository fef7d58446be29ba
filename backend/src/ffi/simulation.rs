//! PyO3 wrapper for the simulation engine
//!
//! This module provides the Python interface used by the dashboard.

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::types::{
    parse_simulation_config, phase_counts_to_py, run_summary_to_py, step_result_to_py,
};
use crate::orchestrator::{
    config_digest, state_digest, Simulation as RustSimulation, SimulationError,
};

/// Python wrapper for the Rust simulation engine
///
/// This class is the entry point for Python code to create and drive
/// simulation runs.
///
/// # Example (from Python)
///
/// ```python
/// from aid_simulator_core_rs import Simulation
///
/// config = {
///     "num_households": 5000,
///     "aid_percent": 20.0,
///     "shock_2_to_3": 0.3,
///     "shock_3_to_4": 0.2,
///     "steps": 20,
///     "strategy": "Target Phase 4",
///     "rng_seed": 42,
/// }
///
/// sim = Simulation.new(config)
/// summary = sim.run()
/// print(f"Critical share: {summary['final_critical_fraction']:.1%}")
/// ```
#[pyclass(name = "Simulation")]
pub struct PySimulation {
    inner: RustSimulation,
}

#[pymethods]
impl PySimulation {
    /// Create a new simulation from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Dictionary containing simulation configuration
    ///
    /// # Returns
    ///
    /// New Simulation instance with its initial population already generated
    ///
    /// # Errors
    ///
    /// Raises ValueError if:
    /// - Required configuration fields missing
    /// - Values out of valid range
    /// - Type conversions fail
    #[staticmethod]
    fn new(config: &Bound<'_, PyDict>) -> PyResult<Self> {
        let rust_config = parse_simulation_config(config)?;

        let inner = RustSimulation::new(rust_config).map_err(|e| match e {
            SimulationError::InvalidConfig(_) => {
                PyErr::new::<pyo3::exceptions::PyValueError, _>(format!("{}", e))
            }
            other => PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!(
                "Failed to create simulation: {}",
                other
            )),
        })?;

        Ok(PySimulation { inner })
    }

    /// Execute one simulation step
    ///
    /// Runs the complete step cycle:
    /// 1. Shock pass (households may worsen one phase)
    /// 2. Aid allocation (capacity households selected by strategy)
    /// 3. Recovery pass (aided households may improve one phase)
    /// 4. Record step result
    ///
    /// # Returns
    ///
    /// Dictionary containing step results:
    /// - `step`: Step number (0-based)
    /// - `shocked`: Households that worsened
    /// - `aided`: Households selected for aid
    /// - `recovered`: Households that improved
    /// - `critical_fraction`: Share in phase 3 or worse after recovery
    ///
    /// # Errors
    ///
    /// Raises RuntimeError if the configured run length was already reached
    fn step(&mut self, py: Python) -> PyResult<Py<PyDict>> {
        let result = self.inner.step().map_err(|e| {
            PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!(
                "Step execution failed: {}",
                e
            ))
        })?;

        step_result_to_py(py, &result)
    }

    /// Run every remaining step and return the final summary
    ///
    /// # Returns
    ///
    /// Dictionary containing:
    /// - `run_id`: Unique run identifier
    /// - `seed`: RNG seed the run used
    /// - `final_counts`: Household counts per phase, `{1: n1, 2: n2, 3: n3, 4: n4}`
    /// - `history`: Critical-share value after each step (list of floats)
    /// - `final_critical_fraction`: Critical share after the last step
    fn run(&mut self, py: Python) -> PyResult<Py<PyDict>> {
        let summary = self.inner.run().map_err(|e| {
            PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!(
                "Run execution failed: {}",
                e
            ))
        })?;

        run_summary_to_py(py, &summary)
    }

    /// Get the unique identifier of this run
    fn run_id(&self) -> String {
        self.inner.run_id().to_string()
    }

    /// Get the number of completed steps
    fn current_step(&self) -> usize {
        self.inner.current_step()
    }

    /// Get the configured run length
    fn num_steps(&self) -> usize {
        self.inner.num_steps()
    }

    /// Whether all configured steps have executed
    fn is_complete(&self) -> bool {
        self.inner.is_complete()
    }

    /// Get the per-step aid capacity in households
    fn aid_capacity(&self) -> usize {
        self.inner.aid_capacity()
    }

    // ========================================================================
    // State Query Methods
    // ========================================================================

    /// Get current household counts per phase
    ///
    /// Returns a dict keyed by integer phase (1..=4); all four phases are
    /// always present.
    ///
    /// # Example (from Python)
    ///
    /// ```python
    /// counts = sim.phase_counts()
    /// print(f"Emergency households: {counts[4]}")
    /// ```
    fn phase_counts(&self, py: Python) -> PyResult<Py<PyDict>> {
        phase_counts_to_py(py, &self.inner.population().phase_counts())
    }

    /// Get the share of households currently in phase 3 or worse
    fn critical_fraction(&self) -> f64 {
        self.inner.population().critical_fraction()
    }

    /// Get per-step results for every completed step
    ///
    /// Returns a list of dictionaries in step order, each with the same
    /// fields as the dict returned by `step()`.
    ///
    /// # Example (from Python)
    ///
    /// ```python
    /// sim.run()
    /// for entry in sim.history():
    ///     print(f"step {entry['step']}: {entry['critical_fraction']:.3f}")
    /// ```
    fn history(&self, py: Python) -> PyResult<Py<PyList>> {
        let py_list = PyList::empty(py);
        for result in self.inner.history().steps() {
            py_list.append(step_result_to_py(py, result)?)?;
        }

        Ok(py_list.into())
    }

    // ========================================================================
    // Digests
    // ========================================================================

    /// SHA-256 digest of the canonical configuration JSON
    ///
    /// Two simulations with the same digest were configured identically.
    fn config_digest(&self) -> PyResult<String> {
        config_digest(self.inner.config()).map_err(|e| {
            PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!(
                "Config digest failed: {}",
                e
            ))
        })
    }

    /// SHA-256 digest of the current simulation state
    ///
    /// Covers step counter, RNG state and every household, so two runs
    /// with equal digests will evolve identically from here on.
    fn state_digest(&self) -> PyResult<String> {
        state_digest(&self.inner).map_err(|e| {
            PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!(
                "State digest failed: {}",
                e
            ))
        })
    }
}
