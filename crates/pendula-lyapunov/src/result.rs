//! Completed chaos maps.

use pendula_model::Params;

use crate::{ChaosMapSignature, SweepGrid};

/// An immutable, fully computed chaos map.
///
/// `values` is row-major (`row * resolution + col`) and every entry is
/// finite and non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct ChaosMapResult {
    grid: SweepGrid,
    values: Vec<f64>,
    max_value: f64,
    params: Params,
    signature: ChaosMapSignature,
}

impl ChaosMapResult {
    /// Wrap a finished sweep. Values are clamped like sweep cells; a short
    /// or long `values` is padded with zeros or truncated to the grid.
    pub fn new(
        grid: SweepGrid,
        params: Params,
        signature: ChaosMapSignature,
        mut values: Vec<f64>,
    ) -> Self {
        values.resize(grid.cell_count(), 0.0);
        for v in values.iter_mut() {
            *v = cell_value(*v);
        }
        let observed = values.iter().copied().fold(0.0, f64::max);
        // An all-zero field still needs a usable divisor.
        let max_value = if observed > 0.0 { observed } else { 1.0 };
        Self {
            grid,
            values,
            max_value,
            params,
            signature,
        }
    }

    pub fn grid(&self) -> &SweepGrid {
        &self.grid
    }

    pub fn resolution(&self) -> usize {
        self.grid.resolution()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn value(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.resolution() || row >= self.resolution() {
            return None;
        }
        self.values.get(self.grid.index(col, row)).copied()
    }

    /// Largest exponent in the map, or 1 when every cell is zero. Always
    /// positive, so it can divide cell values for display.
    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Parameter snapshot the sweep ran against.
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn signature(&self) -> ChaosMapSignature {
        self.signature
    }
}

/// Clamp a raw estimate into a storable cell value.
pub(crate) fn cell_value(exponent: f64) -> f64 {
    if exponent.is_finite() {
        exponent.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LyapunovEstimator;
    use pendula_model::ChaosAxis;

    fn result_with(values: Vec<f64>) -> ChaosMapResult {
        let grid = SweepGrid::new(ChaosAxis::Theta1, ChaosAxis::Theta2, 2).unwrap();
        let params = Params::default();
        let signature =
            ChaosMapSignature::compute(&grid, &params, &LyapunovEstimator::default());
        ChaosMapResult::new(grid, params, signature, values)
    }

    #[test]
    fn test_accessors() {
        let result = result_with(vec![0.0, 1.5, 0.25, 3.0]);
        assert_eq!(result.max_value(), 3.0);
        assert_eq!(result.value(1, 0), Some(1.5));
        assert_eq!(result.value(0, 1), Some(0.25));
        assert_eq!(result.value(2, 0), None);
    }

    #[test]
    fn test_flat_field_max_falls_back_to_one() {
        let result = result_with(vec![0.0; 4]);
        assert_eq!(result.max_value(), 1.0);
        assert!(result.values().iter().all(|v| *v == 0.0));

        let negative = result_with(vec![-2.0, f64::NAN, -0.1, 0.0]);
        assert_eq!(negative.max_value(), 1.0);
    }

    #[test]
    fn test_new_clamps_and_fits_grid() {
        let result = result_with(vec![-1.0, f64::NAN, 2.0]);
        assert_eq!(result.values(), &[0.0, 0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_cell_value_clamps() {
        assert_eq!(cell_value(-0.4), 0.0);
        assert_eq!(cell_value(2.0), 2.0);
        assert_eq!(cell_value(f64::NAN), 0.0);
        assert_eq!(cell_value(f64::INFINITY), 0.0);
    }
}
