//! Simulation health checks for the double pendulum.
//!
//! This crate provides:
//! - Energy-conservation monitoring against a baseline taken at reset
//! - Monotonic-decay checks for damped runs
//! - Solver quality grading from the observed drift

pub mod conservation;
pub mod degradation;

pub use conservation::{ConservationMonitor, ConservationState, EnergyDecayTracker};
pub use degradation::SolverQuality;
