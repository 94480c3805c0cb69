//! Error types for pendula-lyapunov.

use pendula_model::ChaosAxis;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Chaos-map resolution must be in [{min}, {max}], got {resolution}")]
    InvalidResolution {
        resolution: usize,
        min: usize,
        max: usize,
    },

    #[error("Both chaos-map axes sweep {0}")]
    SameAxis(ChaosAxis),
}

pub type Result<T> = std::result::Result<T, SweepError>;
