//! Forward kinematics: bob positions and velocities in the pendulum plane.
//!
//! Coordinates are in meters relative to the pivot, `x` to the right and `y`
//! pointing down, so a pendulum hanging at rest has positive `y`.

use pendula_math::{Phase, Vec2};
use pendula_model::Params;

/// Positions of both bobs (m).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BobPositions {
    pub mass1: Vec2,
    pub mass2: Vec2,
}

/// Compute bob positions for the angles in `phase`.
pub fn bob_positions(params: &Params, phase: &Phase) -> BobPositions {
    let (s1, c1) = phase[0].sin_cos();
    let (s2, c2) = phase[1].sin_cos();
    let mass1 = Vec2::new(params.l1 * s1, params.l1 * c1);
    let mass2 = mass1 + Vec2::new(params.l2 * s2, params.l2 * c2);
    BobPositions { mass1, mass2 }
}

/// Compute bob velocities (m/s).
pub fn bob_velocities(params: &Params, phase: &Phase) -> (Vec2, Vec2) {
    let (s1, c1) = phase[0].sin_cos();
    let (s2, c2) = phase[1].sin_cos();
    let v1 = Vec2::new(params.l1 * c1, -params.l1 * s1) * phase[2];
    let v2 = v1 + Vec2::new(params.l2 * c2, -params.l2 * s2) * phase[3];
    (v1, v2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_hanging_at_rest() {
        let params = Params::default();
        let pos = bob_positions(&params, &Phase::zeros());
        assert_relative_eq!(pos.mass1, Vec2::new(0.0, 1.0));
        assert_relative_eq!(pos.mass2, Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_horizontal() {
        let mut params = Params::default();
        params.l2 = 0.5;
        let pos = bob_positions(&params, &Phase::new(FRAC_PI_2, FRAC_PI_2, 0.0, 0.0));
        assert_relative_eq!(pos.mass1, Vec2::new(1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(pos.mass2, Vec2::new(1.5, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_velocity_matches_finite_difference() {
        let params = Params::default();
        let phase = Phase::new(0.4, -0.3, 1.2, -0.7);
        let h = 1e-6;
        let shifted = Phase::new(phase[0] + phase[2] * h, phase[1] + phase[3] * h, 0.0, 0.0);
        let p0 = bob_positions(&params, &phase);
        let p1 = bob_positions(&params, &shifted);
        let (v1, v2) = bob_velocities(&params, &phase);
        assert_relative_eq!((p1.mass1 - p0.mass1) / h, v1, epsilon = 1e-5);
        assert_relative_eq!((p1.mass2 - p0.mass2) / h, v2, epsilon = 1e-5);
    }
}
