//! Error types for pendula-model.

use thiserror::Error;

use crate::ParamId;

#[derive(Debug, Error)]
pub enum ParamError {
    #[error("{param} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        param: ParamId,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{param} must be finite")]
    NonFinite { param: ParamId },

    #[error("Unknown parameter: {0}")]
    UnknownParam(String),

    #[error("{0} cannot be used as a chaos-map axis")]
    NotAnAxis(ParamId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ParamError>;
