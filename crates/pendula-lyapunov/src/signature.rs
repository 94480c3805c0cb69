//! Identity of a chaos-map sweep.
//!
//! Two sweeps with the same signature produce the same matrix. The digest
//! covers the grid shape, the estimator settings and every parameter that is
//! *not* swept, rounded to 6 decimals in external units so that a value read
//! back from a slider does not look like an edit. Swept fields are excluded:
//! writing a picked cell back into the parameters keeps the map current.

use std::fmt;

use pendula_model::{ParamId, Params};

use crate::{LyapunovEstimator, SweepGrid};

const DECIMALS: f64 = 1e6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChaosMapSignature([u8; 32]);

impl ChaosMapSignature {
    pub fn compute(grid: &SweepGrid, params: &Params, estimator: &LyapunovEstimator) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(grid.axis_x().param().name().as_bytes());
        hasher.update(b"/");
        hasher.update(grid.axis_y().param().name().as_bytes());
        hasher.update(&(grid.resolution() as u64).to_le_bytes());

        hasher.update(&estimator.epsilon.to_le_bytes());
        hasher.update(&estimator.duration.to_le_bytes());
        hasher.update(&estimator.dt.to_le_bytes());

        let swept = [grid.axis_x().param(), grid.axis_y().param()];
        for id in ParamId::ALL {
            if swept.contains(&id) {
                continue;
            }
            let rounded = (params.get_external(id) * DECIMALS).round() as i64;
            hasher.update(id.name().as_bytes());
            hasher.update(&rounded.to_le_bytes());
        }

        Self(*hasher.finalize().as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First 8 hex digits, for log lines.
    pub fn short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ChaosMapSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}
