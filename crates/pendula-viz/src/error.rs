//! Error types for pendula-viz.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VizError {
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VizError>;
