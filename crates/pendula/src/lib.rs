//! pendula: a double-pendulum simulator with finite-time Lyapunov chaos maps.
//!
//! This is the umbrella crate. It provides the [`Simulator`] driver and the
//! [`Session`] that hosts talk to, and re-exports the core types from the
//! sub-crates.

pub mod error;
pub mod session;

pub use pendula_guardian::{self, ConservationMonitor, ConservationState, SolverQuality};
pub use pendula_lyapunov::{
    self, ChaosMapBuilder, ChaosMapResult, ChaosMapSignature, LyapunovEstimator, SweepGrid,
    SweepHandle,
};
pub use pendula_math::{self, Phase, Vec2};
pub use pendula_model::{
    self, ChaosAxis, ParamError, ParamId, Params, SessionConfig, State,
};
pub use pendula_rigid::{self, Rk4Solver, Solver, bob_positions, total_energy};
pub use pendula_viz::{self, ExportOptions, Pose, Projector, Snapshot, TrailVertex};
pub use pendula_world::{self, Trail, TrailPoint};

pub use error::{Result, SessionError};
pub use session::{CellPick, Frame, PlayState, Session, pick_chaos_map_cell};

/// Main simulation driver.
pub struct Simulator {
    solver: Box<dyn Solver>,
}

impl Simulator {
    /// Create a simulator with the RK4 solver.
    pub fn new() -> Self {
        Self {
            solver: Box::new(Rk4Solver),
        }
    }

    /// Create a simulator with a custom solver.
    pub fn with_solver(solver: Box<dyn Solver>) -> Self {
        Self { solver }
    }

    /// Advance simulation by one step of size `dt`.
    pub fn step(&self, params: &Params, state: &mut State, dt: f64) {
        self.solver.step(params, state, dt);
    }

    /// Run simulation for `n` steps.
    pub fn simulate(&self, params: &Params, state: &mut State, dt: f64, n: usize) {
        self.solver.simulate(params, state, dt, n);
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Explicit Euler, to check the simulator really delegates.
    struct EulerSolver;

    impl Solver for EulerSolver {
        fn advance(&self, params: &Params, phase: &Phase, dt: f64) -> Phase {
            phase + pendula_rigid::derivatives(params, phase) * dt
        }
    }

    #[test]
    fn test_simulator_matches_solver() {
        let params = Params::default();
        let mut a = State::from_params(&params);
        let mut b = a;
        Simulator::new().simulate(&params, &mut a, 0.001, 100);
        Rk4Solver.simulate(&params, &mut b, 0.001, 100);
        assert_eq!(a, b);
        assert_relative_eq!(a.time, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_custom_solver() {
        let params = Params::default();
        let mut euler = State::from_params(&params);
        let mut rk4 = euler;
        Simulator::with_solver(Box::new(EulerSolver)).step(&params, &mut euler, 0.01);
        Simulator::default().step(&params, &mut rk4, 0.01);
        assert_ne!(euler.phase, rk4.phase);
        assert_relative_eq!(euler.phase, rk4.phase, epsilon = 1e-2);
    }
}
