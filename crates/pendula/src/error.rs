//! Error types for the pendula session.

use pendula_lyapunov::{ChaosMapSignature, SweepError, SweepHandle};
use pendula_model::ParamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Sweep(#[from] SweepError),

    #[error("Chaos map is stale: computed for {found}, current parameters give {expected}")]
    StaleChaosMap {
        expected: ChaosMapSignature,
        found: ChaosMapSignature,
    },

    #[error("No chaos map has been computed")]
    NoChaosMap,

    #[error("Unknown or superseded {0}")]
    UnknownSweep(SweepHandle),

    #[error("Pixel ({x}, {y}) is outside the chaos map")]
    PickOutOfBounds { x: f64, y: f64 },

    #[error("{setting} must be in [{min}, {max}], got {value}")]
    InvalidSetting {
        setting: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

pub type Result<T> = std::result::Result<T, SessionError>;
