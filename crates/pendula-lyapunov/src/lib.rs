//! Chaos sensitivity of the double pendulum.
//!
//! This crate provides:
//! - A finite-time Lyapunov estimator (Benettin renormalization)
//! - The linear grid mapping between chaos-map cells and parameter values
//! - Signatures that gate recomputation of a sweep
//! - An incremental, generation-gated chaos-map builder and a
//!   row-parallel batch sweep

pub mod builder;
pub mod error;
pub mod estimator;
pub mod grid;
pub mod result;
pub mod signature;

pub use builder::{ChaosMapBuilder, SweepChunk, SweepHandle, SweepJob, sweep_parallel};
pub use error::{Result, SweepError};
pub use estimator::{LyapunovEstimate, LyapunovEstimator};
pub use grid::SweepGrid;
pub use result::ChaosMapResult;
pub use signature::ChaosMapSignature;
