//! Python interface (compiled only with the `pyo3` feature)
//!
//! One wrapper class around the simulation engine plus dict/list conversion
//! helpers. All simulation logic lives in the pure-Rust modules.

pub mod simulation;
pub mod types;
