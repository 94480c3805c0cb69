//! Parameter and state types for the pendula double-pendulum engine.
//!
//! `Params` is the physical description of the system plus its initial
//! conditions; it is the single source of truth for "current" physics.
//! `State` is the live phase-space point that evolves under integration and
//! is re-derived from `Params` on every reset.

pub mod config;
pub mod error;
pub mod param;
pub mod params;
pub mod state;

pub use config::{ChaosMapConfig, RenderConfig, SessionConfig, SimulationConfig, TrailConfig};
pub use error::{ParamError, Result};
pub use param::{ChaosAxis, ParamId, ParamSpec};
pub use params::Params;
pub use state::State;
