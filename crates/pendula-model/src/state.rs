//! Simulation state: the live phase-space point.

use pendula_math::{OMEGA1, OMEGA2, Phase, THETA1, THETA2, is_finite_phase};

use crate::Params;

/// Mutable simulation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    /// `(θ1, θ2, ω1, ω2)` in radians and rad/s.
    pub phase: Phase,
    /// Simulated time since the last reset (s).
    pub time: f64,
}

impl State {
    /// State at the initial conditions stored in `params`.
    pub fn from_params(params: &Params) -> Self {
        Self {
            phase: params.initial_phase(),
            time: 0.0,
        }
    }

    pub fn theta1(&self) -> f64 {
        self.phase[THETA1]
    }

    pub fn theta2(&self) -> f64 {
        self.phase[THETA2]
    }

    pub fn omega1(&self) -> f64 {
        self.phase[OMEGA1]
    }

    pub fn omega2(&self) -> f64 {
        self.phase[OMEGA2]
    }

    /// False once the trajectory has blown up to NaN/Inf.
    pub fn is_finite(&self) -> bool {
        is_finite_phase(&self.phase) && self.time.is_finite()
    }
}

impl Default for State {
    fn default() -> Self {
        Self::from_params(&Params::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParamId;

    #[test]
    fn test_from_params() {
        let mut params = Params::default();
        params.set_external(ParamId::Omega1, 1.5).unwrap();
        let state = State::from_params(&params);
        assert_eq!(state.theta1(), params.theta1);
        assert_eq!(state.omega1(), 1.5);
        assert_eq!(state.omega2(), 0.0);
        assert_eq!(state.time, 0.0);
        assert!(state.is_finite());
    }
}
