//! Chaos-map rasters.
//!
//! One pixel per cell, row 0 at the top. The optional overlay draws the
//! interior grid lines, the zero axes of both swept parameters (or the
//! middle of the map when zero is out of range) and tick marks along the
//! axes where the grid lines cross them.

use image::{Rgb, RgbImage};
use pendula_lyapunov::ChaosMapResult;
use pendula_model::{ParamSpec, RenderConfig};

use crate::palette::{OVERLAY, blend, chaos_color};

/// Chaos-map overlay settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapOverlay {
    /// Grid cells per side; `divisions - 1` interior lines are drawn.
    pub divisions: usize,
    pub grid_alpha: f64,
    pub axis_alpha: f64,
    /// Half-length of the tick marks (px).
    pub tick: usize,
}

impl Default for MapOverlay {
    fn default() -> Self {
        Self {
            divisions: 4,
            grid_alpha: 0.12,
            axis_alpha: 0.35,
            tick: 3,
        }
    }
}

impl From<&RenderConfig> for MapOverlay {
    fn from(render: &RenderConfig) -> Self {
        Self {
            divisions: render.grid_divisions.max(1),
            ..Self::default()
        }
    }
}

/// Pixels covered by one stroke layer. Each pixel is blended once per
/// layer no matter how many lines cross it.
struct Layer {
    size: usize,
    mask: Vec<bool>,
}

impl Layer {
    fn new(size: usize) -> Self {
        Self {
            size,
            mask: vec![false; size * size],
        }
    }

    fn set(&mut self, x: isize, y: isize) {
        let n = self.size as isize;
        if (0..n).contains(&x) && (0..n).contains(&y) {
            self.mask[y as usize * self.size + x as usize] = true;
        }
    }

    fn column(&mut self, x: usize) {
        for y in 0..self.size {
            self.set(x as isize, y as isize);
        }
    }

    fn row(&mut self, y: usize) {
        for x in 0..self.size {
            self.set(x as isize, y as isize);
        }
    }

    fn apply(&self, image: &mut RgbImage, color: Rgb<u8>, alpha: f64) {
        for (i, covered) in self.mask.iter().enumerate() {
            if *covered {
                let (x, y) = ((i % self.size) as u32, (i / self.size) as u32);
                let pixel = image.get_pixel_mut(x, y);
                *pixel = blend(*pixel, color, alpha);
            }
        }
    }
}

/// Pixel row/column a fractional position falls on, clamped to the map.
fn snap(v: f64, size: usize) -> usize {
    let last = size.saturating_sub(1) as f64;
    (v + 0.5).floor().clamp(0.0, last) as usize
}

/// Position of the zero value along an axis, or the middle of the map.
fn axis_pixel(spec: &ParamSpec, size: usize, invert: bool) -> f64 {
    let last = size.saturating_sub(1) as f64;
    if spec.min <= 0.0 && spec.max >= 0.0 {
        let pos = (0.0 - spec.min) / (spec.max - spec.min) * last;
        if invert { last - pos } else { pos }
    } else {
        last / 2.0
    }
}

/// Grid line positions for `divisions` equal parts of the map.
pub fn grid_lines(size: usize, divisions: usize) -> Vec<usize> {
    (1..divisions)
        .map(|i| snap(size as f64 / divisions as f64 * i as f64, size))
        .collect()
}

/// Pixel column and row of the X and Y zero axes.
pub fn axis_lines(result: &ChaosMapResult) -> (usize, usize) {
    let size = result.resolution();
    let grid = result.grid();
    let x = snap(axis_pixel(grid.axis_x().spec(), size, false), size);
    let y = snap(axis_pixel(grid.axis_y().spec(), size, true), size);
    (x, y)
}

/// Render `result` as a `resolution × resolution` image.
pub fn render_chaos_map(result: &ChaosMapResult, overlay: Option<&MapOverlay>) -> RgbImage {
    let size = result.resolution();
    let max = result.max_value();
    let mut image = RgbImage::from_fn(size as u32, size as u32, |x, y| {
        let value = result.value(x as usize, y as usize).unwrap_or(0.0);
        chaos_color(value, max)
    });
    if let Some(overlay) = overlay {
        draw_overlay(&mut image, result, overlay);
    }
    image
}

fn draw_overlay(image: &mut RgbImage, result: &ChaosMapResult, overlay: &MapOverlay) {
    let size = result.resolution();
    let lines = grid_lines(size, overlay.divisions);

    let mut grid = Layer::new(size);
    for &pos in &lines {
        grid.column(pos);
        grid.row(pos);
    }
    grid.apply(image, OVERLAY, overlay.grid_alpha);

    let (axis_x, axis_y) = axis_lines(result);
    let mut axes = Layer::new(size);
    axes.column(axis_x);
    axes.row(axis_y);
    let tick = overlay.tick as isize;
    for &pos in &lines {
        for d in -tick..=tick {
            axes.set(axis_x as isize + d, pos as isize);
            axes.set(pos as isize, axis_y as isize + d);
        }
    }
    axes.apply(image, OVERLAY, overlay.axis_alpha);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{CHAOTIC, STABLE};
    use crate::test_support::map_with;
    use pendula_model::ChaosAxis;

    #[test]
    fn test_plain_raster_uses_gradient() {
        let result = map_with(ChaosAxis::Theta1, ChaosAxis::Theta2, 4, |col, row| {
            if (col, row) == (3, 0) { 2.0 } else { 0.0 }
        });
        let image = render_chaos_map(&result, None);
        assert_eq!(image.dimensions(), (4, 4));
        assert_eq!(*image.get_pixel(3, 0), CHAOTIC);
        assert_eq!(*image.get_pixel(0, 0), STABLE);
    }

    #[test]
    fn test_flat_map_is_stable() {
        let result = map_with(ChaosAxis::Theta1, ChaosAxis::Theta2, 3, |_, _| 0.0);
        let image = render_chaos_map(&result, None);
        assert!(image.pixels().all(|p| *p == STABLE));
    }

    #[test]
    fn test_grid_and_axis_positions() {
        assert_eq!(grid_lines(100, 4), vec![25, 50, 75]);
        assert_eq!(grid_lines(10, 4), vec![3, 5, 8]);

        // Symmetric ranges: zero sits at (R-1)/2 = 49.5, which rounds up.
        let result = map_with(ChaosAxis::Theta1, ChaosAxis::Omega2, 100, |_, _| 0.0);
        assert_eq!(axis_lines(&result), (50, 50));
    }

    #[test]
    fn test_overlay_blends_once_per_layer() {
        let result = map_with(ChaosAxis::Theta1, ChaosAxis::Theta2, 100, |_, _| 0.0);
        let image = render_chaos_map(&result, Some(&MapOverlay::default()));

        // Untouched cell.
        assert_eq!(*image.get_pixel(10, 10), STABLE);
        // Grid line only.
        let grid = blend(STABLE, OVERLAY, 0.12);
        assert_eq!(*image.get_pixel(25, 10), grid);
        // Grid line crossing a grid line is still blended once.
        assert_eq!(*image.get_pixel(25, 75), grid);
        // Axis over grid: both layers.
        let both = blend(grid, OVERLAY, 0.35);
        assert_eq!(*image.get_pixel(50, 10), both);
        // Tick on the X axis row next to a grid column.
        assert_eq!(*image.get_pixel(25, 52), blend(grid, OVERLAY, 0.35));
        assert_eq!(*image.get_pixel(30, 52), STABLE);
    }
}
