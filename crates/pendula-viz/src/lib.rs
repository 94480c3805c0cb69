//! Presentation layer for pendula.
//!
//! Nothing here draws. The projector turns pendulum-plane geometry into
//! screen coordinates and opacities, the raster module turns a chaos map
//! into an RGB image, and the export module bundles both with the parameter
//! table into a [`Snapshot`].

pub mod error;
pub mod export;
pub mod palette;
pub mod projector;
pub mod raster;

pub use error::{Result, VizError};
pub use export::{
    AxisInfo, ExportOptions, MAX_EXPORT_SIDE, Marker, ParamRow, Snapshot, compose_snapshot,
    parameter_table,
};
pub use palette::{blend, chaos_color};
pub use projector::{Pose, Projector, TrailVertex, trail_alpha};
pub use raster::{MapOverlay, axis_lines, grid_lines, render_chaos_map};

#[cfg(test)]
pub(crate) mod test_support {
    use pendula_lyapunov::{ChaosMapResult, ChaosMapSignature, LyapunovEstimator, SweepGrid};
    use pendula_model::{ChaosAxis, Params};

    /// A finished map whose cells hold `f(col, row)`.
    pub fn map_with(
        axis_x: ChaosAxis,
        axis_y: ChaosAxis,
        resolution: usize,
        f: impl Fn(usize, usize) -> f64,
    ) -> ChaosMapResult {
        let grid = SweepGrid::new(axis_x, axis_y, resolution).unwrap();
        let params = Params::default();
        let values = (0..grid.cell_count())
            .map(|i| {
                let (col, row) = grid.coords(i);
                f(col, row)
            })
            .collect();
        let signature =
            ChaosMapSignature::compute(&grid, &params, &LyapunovEstimator::default());
        ChaosMapResult::new(grid, params, signature, values)
    }
}
