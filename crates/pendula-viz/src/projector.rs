//! Pendulum-plane to screen projection.
//!
//! The pivot sits horizontally centred at `pivot_y_fraction` of the viewport
//! height. The scale (px per meter) makes the fully extended pendulum span
//! `fill_fraction` of the viewport's short side, whatever the rod lengths.

use pendula_math::{Phase, Vec2, is_finite_phase, map_range};
use pendula_model::{Params, RenderConfig};
use pendula_rigid::bob_positions;
use pendula_world::Trail;
use serde::Serialize;

/// Opacity of a fully drawn trail.
const TRAIL_ALPHA_MAX: f64 = 0.8;
/// Opacity of the oldest point of a finite trail.
const TRAIL_ALPHA_MIN: f64 = 0.1;

/// Screen-space geometry of one displayed pose (px).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    pub pivot: [f64; 2],
    pub mass1: [f64; 2],
    pub mass2: [f64; 2],
    pub pivot_radius: f64,
    pub radius1: f64,
    pub radius2: f64,
}

/// A trail point ready to stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrailVertex {
    pub x: f64,
    pub y: f64,
    pub alpha: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    width: f64,
    height: f64,
    pivot: Vec2,
    scale: f64,
    pivot_radius: f64,
    mass_radius: f64,
}

impl Projector {
    /// Projector for a viewport described by `render` and a pendulum whose
    /// rods add up to `total_length` meters.
    pub fn new(render: &RenderConfig, total_length: f64) -> Self {
        let (width, height) = (render.width, render.height);
        let scale = if total_length > 0.0 {
            width.min(height) * render.fill_fraction / total_length
        } else {
            0.0
        };
        Self {
            width,
            height,
            pivot: Vec2::new(width / 2.0, height * render.pivot_y_fraction),
            scale,
            pivot_radius: render.pivot_radius,
            mass_radius: render.mass_radius,
        }
    }

    pub fn for_params(render: &RenderConfig, params: &Params) -> Self {
        Self::new(render, params.l1 + params.l2)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Pixels per meter.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pivot(&self) -> Vec2 {
        self.pivot
    }

    /// Pendulum-plane point (m from the pivot) to screen pixels.
    pub fn to_screen(&self, plane: Vec2) -> Vec2 {
        self.pivot + plane * self.scale
    }

    /// Bob radii (px), growing with the square root of each mass.
    pub fn mass_radii(&self, params: &Params) -> (f64, f64) {
        (
            self.mass_radius * params.m1.max(0.0).sqrt(),
            self.mass_radius * params.m2.max(0.0).sqrt(),
        )
    }

    /// Screen geometry for the angles in `phase`, or `None` when the phase
    /// is no longer finite.
    pub fn project(&self, params: &Params, phase: &Phase) -> Option<Pose> {
        if !is_finite_phase(phase) {
            return None;
        }
        let bobs = bob_positions(params, phase);
        let m1 = self.to_screen(bobs.mass1);
        let m2 = self.to_screen(bobs.mass2);
        let (radius1, radius2) = self.mass_radii(params);
        Some(Pose {
            pivot: [self.pivot.x, self.pivot.y],
            mass1: [m1.x, m1.y],
            mass2: [m2.x, m2.y],
            pivot_radius: self.pivot_radius,
            radius1,
            radius2,
        })
    }

    /// Trail in screen pixels with its fade applied, oldest first.
    pub fn project_trail(&self, trail: &Trail) -> Vec<TrailVertex> {
        let len = trail.len();
        trail
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let p = self.to_screen(point.position());
                TrailVertex {
                    x: p.x,
                    y: p.y,
                    alpha: trail_alpha(i, len, trail.infinite),
                }
            })
            .collect()
    }
}

/// Opacity of the `index`-th of `len` trail points (oldest first).
///
/// Ramps from 0.1 to 0.8 along a finite trail; an infinite trail is drawn
/// at a constant 0.8.
pub fn trail_alpha(index: usize, len: usize, infinite: bool) -> f64 {
    if infinite || len == 0 {
        return TRAIL_ALPHA_MAX;
    }
    map_range(index as f64, 0.0, len as f64, TRAIL_ALPHA_MIN, TRAIL_ALPHA_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pendula_model::TrailConfig;

    #[test]
    fn test_default_viewport() {
        let projector = Projector::for_params(&RenderConfig::default(), &Params::default());
        // 760 * 0.42 / 2 m
        assert_relative_eq!(projector.scale(), 159.6, epsilon = 1e-9);
        assert_relative_eq!(projector.pivot(), Vec2::new(380.0, 288.8), epsilon = 1e-9);
    }

    #[test]
    fn test_scale_tracks_rod_lengths() {
        let render = RenderConfig {
            width: 1000.0,
            height: 500.0,
            ..RenderConfig::default()
        };
        let mut params = Params::default();
        params.l1 = 2.0;
        params.l2 = 2.0;
        let projector = Projector::for_params(&render, &params);
        assert_relative_eq!(projector.scale(), 500.0 * 0.42 / 4.0);

        // Fully extended downward, the second bob lands fill_fraction of the
        // short side below the pivot.
        let pose = projector.project(&params, &Phase::zeros()).unwrap();
        assert_relative_eq!(pose.mass2[1] - pose.pivot[1], 500.0 * 0.42, epsilon = 1e-9);
        assert_relative_eq!(pose.mass2[0], 500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mass_radii() {
        let projector = Projector::for_params(&RenderConfig::default(), &Params::default());
        let mut params = Params::default();
        params.m2 = 4.0;
        assert_eq!(projector.mass_radii(&params), (15.0, 30.0));
    }

    #[test]
    fn test_non_finite_pose_is_skipped() {
        let params = Params::default();
        let projector = Projector::for_params(&RenderConfig::default(), &params);
        assert!(projector.project(&params, &Phase::new(f64::NAN, 0.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_trail_alpha_ramp() {
        assert_relative_eq!(trail_alpha(0, 10, false), 0.1);
        assert_relative_eq!(trail_alpha(5, 10, false), 0.45, epsilon = 1e-12);
        assert!(trail_alpha(9, 10, false) < 0.8);
        assert_eq!(trail_alpha(0, 10, true), 0.8);
    }

    #[test]
    fn test_project_trail() {
        let projector = Projector::for_params(&RenderConfig::default(), &Params::default());
        let mut trail = Trail::new(&TrailConfig::default());
        trail.push(Vec2::new(0.0, 1.0), 0.0);
        trail.push(Vec2::new(1.0, 0.0), 0.1);
        let vertices = projector.project_trail(&trail);
        assert_eq!(vertices.len(), 2);
        assert_relative_eq!(vertices[0].y, 288.8 + 159.6, epsilon = 1e-9);
        assert_relative_eq!(vertices[1].x, 380.0 + 159.6, epsilon = 1e-9);
        assert_relative_eq!(vertices[0].alpha, 0.1);
    }
}
