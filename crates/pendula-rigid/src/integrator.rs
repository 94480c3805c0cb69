//! Fixed-step time integration.

use pendula_math::Phase;
use pendula_model::{Params, State};

use crate::dynamics::derivatives;

/// Pluggable solver trait.
///
/// Implementations define how to advance the phase-space point by one step.
/// Steps never fail: pathological inputs come back as NaN/Inf and callers
/// check finiteness before rendering or accumulating.
pub trait Solver {
    /// Return the phase one step of size `dt` after `phase`.
    fn advance(&self, params: &Params, phase: &Phase, dt: f64) -> Phase;

    /// Advance `state` by `dt` in place.
    fn step(&self, params: &Params, state: &mut State, dt: f64) {
        state.phase = self.advance(params, &state.phase, dt);
        state.time += dt;
    }

    /// Run `n` steps of size `dt`.
    fn simulate(&self, params: &Params, state: &mut State, dt: f64, n: usize) {
        for _ in 0..n {
            self.step(params, state, dt);
        }
    }
}

/// Classical 4th-order Runge-Kutta integrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rk4Solver;

impl Solver for Rk4Solver {
    fn advance(&self, params: &Params, phase: &Phase, dt: f64) -> Phase {
        let k1 = derivatives(params, phase);
        let k2 = derivatives(params, &(phase + k1 * (dt / 2.0)));
        let k3 = derivatives(params, &(phase + k2 * (dt / 2.0)));
        let k4 = derivatives(params, &(phase + k3 * dt));

        phase + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rest_stays_at_rest() {
        let params = Params::default();
        let mut state = State {
            phase: Phase::zeros(),
            time: 0.0,
        };
        Rk4Solver.simulate(&params, &mut state, 0.001, 500);
        assert_relative_eq!(state.phase.norm(), 0.0);
        assert_relative_eq!(state.time, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_free_rotation_is_exact() {
        // No gravity, aligned rods spinning together: uniform rotation.
        let mut params = Params::default();
        params.g = 0.0;
        let phase = Phase::new(0.0, 0.0, 1.5, 1.5);
        let next = Rk4Solver.advance(&params, &phase, 0.01);
        assert_relative_eq!(next[0], 0.015, epsilon = 1e-14);
        assert_relative_eq!(next[1], 0.015, epsilon = 1e-14);
        assert_relative_eq!(next[2], 1.5, epsilon = 1e-14);
    }

    #[test]
    fn test_deterministic() {
        let params = Params::default();
        let phase = params.initial_phase();
        let a = Rk4Solver.advance(&params, &phase, 0.01);
        let b = Rk4Solver.advance(&params, &phase, 0.01);
        assert_eq!(a, b);
    }

    #[test]
    fn test_pathological_input_propagates_nan() {
        let params = Params::default();
        let phase = Phase::new(f64::NAN, 0.0, 0.0, 0.0);
        let next = Rk4Solver.advance(&params, &phase, 0.01);
        assert!(next[0].is_nan());
    }
}
