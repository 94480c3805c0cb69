//! Linear mapping between chaos-map cells and swept parameter values.
//!
//! Columns sweep the X axis from its minimum to its maximum. Rows sweep the
//! Y axis from its *maximum* (row 0) down to its minimum, so a rendered map
//! reads with Y increasing upward. Values are in external units (degrees for
//! angles) and are converted when written into [`Params`].

use pendula_math::map_range;
use pendula_model::{ChaosAxis, ChaosMapConfig, Params};

use crate::{Result, SweepError};

/// Shape of a chaos-map sweep: its two axes and side length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepGrid {
    resolution: usize,
    axis_x: ChaosAxis,
    axis_y: ChaosAxis,
}

impl SweepGrid {
    pub fn new(axis_x: ChaosAxis, axis_y: ChaosAxis, resolution: usize) -> Result<Self> {
        let (min, max) = ChaosMapConfig::RESOLUTION_RANGE;
        if !(min..=max).contains(&resolution) {
            return Err(SweepError::InvalidResolution {
                resolution,
                min,
                max,
            });
        }
        if axis_x == axis_y {
            return Err(SweepError::SameAxis(axis_x));
        }
        Ok(Self {
            resolution,
            axis_x,
            axis_y,
        })
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn axis_x(&self) -> ChaosAxis {
        self.axis_x
    }

    pub fn axis_y(&self) -> ChaosAxis {
        self.axis_y
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.resolution * self.resolution
    }

    /// Row-major index of `(col, row)`.
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.resolution + col
    }

    /// `(col, row)` of a row-major index.
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.resolution, index / self.resolution)
    }

    fn last(&self) -> f64 {
        (self.resolution - 1) as f64
    }

    /// External X/Y values swept at `(col, row)`.
    pub fn cell_values(&self, col: usize, row: usize) -> (f64, f64) {
        let sx = self.axis_x.spec();
        let sy = self.axis_y.spec();
        let x = map_range(col as f64, 0.0, self.last(), sx.min, sx.max);
        let y = map_range(row as f64, 0.0, self.last(), sy.max, sy.min);
        (x, y)
    }

    /// `base` with both swept fields overridden by the values at `(col, row)`.
    pub fn cell_params(&self, base: &Params, col: usize, row: usize) -> Params {
        let (x, y) = self.cell_values(col, row);
        let mut params = *base;
        let (px, py) = (self.axis_x.param(), self.axis_y.param());
        params.set(px, px.spec().to_internal(x));
        params.set(py, py.spec().to_internal(y));
        params
    }

    /// Nearest cell to a pair of external axis values, clamped to the grid.
    pub fn cell_at(&self, x: f64, y: f64) -> (usize, usize) {
        let sx = self.axis_x.spec();
        let sy = self.axis_y.spec();
        let col = map_range(x, sx.min, sx.max, 0.0, self.last());
        let row = map_range(y, sy.max, sy.min, 0.0, self.last());
        (self.snap(col), self.snap(row))
    }

    fn snap(&self, v: f64) -> usize {
        if v.is_nan() {
            return 0;
        }
        v.round().clamp(0.0, self.last()) as usize
    }

    /// Cell under a pixel of a `width × height` canvas showing the map.
    ///
    /// Returns `None` for coordinates off the canvas.
    pub fn pick_cell(&self, px: f64, py: f64, width: f64, height: f64) -> Option<(usize, usize)> {
        if !(width > 0.0 && height > 0.0) {
            return None;
        }
        if !(0.0..=width).contains(&px) || !(0.0..=height).contains(&py) {
            return None;
        }
        let r = self.resolution as f64;
        let col = (px / width * r).floor().min(self.last());
        let row = (py / height * r).floor().min(self.last());
        Some((col as usize, row as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pendula_math::deg_to_rad;
    use proptest::prelude::*;

    fn theta_grid(resolution: usize) -> SweepGrid {
        SweepGrid::new(ChaosAxis::Theta1, ChaosAxis::Theta2, resolution).unwrap()
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(matches!(
            SweepGrid::new(ChaosAxis::Theta1, ChaosAxis::Theta2, 1),
            Err(SweepError::InvalidResolution { resolution: 1, .. })
        ));
        assert!(matches!(
            SweepGrid::new(ChaosAxis::Omega1, ChaosAxis::Omega1, 10),
            Err(SweepError::SameAxis(ChaosAxis::Omega1))
        ));
    }

    #[test]
    fn test_corners_with_inverted_y() {
        let grid = theta_grid(10);
        assert_eq!(grid.cell_values(0, 0), (-180.0, 180.0));
        assert_eq!(grid.cell_values(9, 9), (180.0, -180.0));
        assert_eq!(grid.cell_values(0, 9), (-180.0, -180.0));
    }

    #[test]
    fn test_cell_params_keeps_other_fields() {
        let grid = SweepGrid::new(ChaosAxis::Omega2, ChaosAxis::Theta1, 5).unwrap();
        let mut base = Params::default();
        base.m2 = 2.5;
        base.theta2 = 0.3;
        let p = grid.cell_params(&base, 4, 0);
        assert_relative_eq!(p.omega2, 10.0);
        assert_relative_eq!(p.theta1, deg_to_rad(180.0));
        assert_eq!(p.theta2, 0.3);
        assert_eq!(p.m2, 2.5);
        assert_eq!(p.omega1, base.omega1);
    }

    #[test]
    fn test_index_layout() {
        let grid = theta_grid(7);
        assert_eq!(grid.cell_count(), 49);
        assert_eq!(grid.index(3, 2), 17);
        assert_eq!(grid.coords(17), (3, 2));
    }

    #[test]
    fn test_pick_cell() {
        let grid = theta_grid(10);
        assert_eq!(grid.pick_cell(0.0, 0.0, 200.0, 200.0), Some((0, 0)));
        assert_eq!(grid.pick_cell(200.0, 200.0, 200.0, 200.0), Some((9, 9)));
        assert_eq!(grid.pick_cell(39.9, 20.0, 200.0, 200.0), Some((1, 1)));
        assert_eq!(grid.pick_cell(-1.0, 20.0, 200.0, 200.0), None);
        assert_eq!(grid.pick_cell(f64::NAN, 20.0, 200.0, 200.0), None);
    }

    #[test]
    fn test_cell_at_clamps() {
        let grid = theta_grid(10);
        assert_eq!(grid.cell_at(-500.0, 500.0), (0, 0));
        assert_eq!(grid.cell_at(500.0, -500.0), (9, 9));
    }

    proptest! {
        #[test]
        fn prop_cell_round_trip(resolution in 2usize..=400, col_frac in 0.0f64..1.0, row_frac in 0.0f64..1.0) {
            let grid = SweepGrid::new(ChaosAxis::Omega1, ChaosAxis::Theta2, resolution).unwrap();
            let col = ((resolution as f64) * col_frac) as usize;
            let row = ((resolution as f64) * row_frac) as usize;
            let (x, y) = grid.cell_values(col, row);
            prop_assert!((-10.0..=10.0).contains(&x));
            prop_assert!((-180.0..=180.0).contains(&y));
            prop_assert_eq!(grid.cell_at(x, y), (col, row));

            // Centre of the cell's pixel block on a canvas one pixel per cell.
            let r = resolution as f64;
            let picked = grid.pick_cell(col as f64 + 0.5, row as f64 + 0.5, r, r);
            prop_assert_eq!(picked, Some((col, row)));
        }
    }
}
