//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm for fast, deterministic random number
//! generation. CRITICAL: all randomness in the simulator MUST go through
//! this module; components take `&mut RngManager` explicitly so that a run
//! is fully reproducible from its seed.

mod xorshift;

pub use xorshift::RngManager;
