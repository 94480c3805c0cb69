//! Finite-time Lyapunov exponent of a double-pendulum trajectory.
//!
//! Two trajectories start `epsilon` apart in θ1 and are advanced with the
//! same RK4 step. After every step the phase-space separation `d` is
//! measured, `ln(d / epsilon)` is accumulated and the perturbed trajectory is
//! pulled back along the separation direction to distance `epsilon`
//! (Benettin renormalization). The estimate is the accumulated log-growth
//! divided by the simulated duration.
//!
//! The separation is the plain Euclidean norm of the 4-vector
//! `(Δθ1, Δθ2, Δω1, Δω2)`; angles and angular velocities are not weighted
//! against each other.

use pendula_math::{Phase, THETA1};
use pendula_model::{ChaosMapConfig, Params};
use pendula_rigid::{Rk4Solver, Solver};

/// Settings for one finite-time Lyapunov estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LyapunovEstimator {
    /// Initial separation in θ1 (rad).
    pub epsilon: f64,
    /// Simulated duration (s).
    pub duration: f64,
    /// RK4 step (s).
    pub dt: f64,
}

impl Default for LyapunovEstimator {
    fn default() -> Self {
        Self::from(&ChaosMapConfig::default())
    }
}

impl From<&ChaosMapConfig> for LyapunovEstimator {
    fn from(config: &ChaosMapConfig) -> Self {
        Self {
            epsilon: config.perturbation,
            duration: config.simulation_time,
            dt: config.dt,
        }
    }
}

/// Outcome of one estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LyapunovEstimate {
    /// Average exponential growth rate (1/s). May be negative.
    pub exponent: f64,
    /// Steps whose separation was accumulated.
    pub accumulated_steps: usize,
    /// Steps skipped because the separation was zero or non-finite.
    pub skipped_steps: usize,
}

impl LyapunovEstimator {
    /// Number of RK4 steps per trajectory.
    pub fn steps(&self) -> usize {
        (self.duration / self.dt).floor() as usize
    }

    /// Estimate the exponent for the initial conditions stored in `params`.
    pub fn estimate(&self, params: &Params) -> f64 {
        self.estimate_detailed(params).exponent
    }

    /// Estimate the exponent and report how many steps were usable.
    pub fn estimate_detailed(&self, params: &Params) -> LyapunovEstimate {
        let solver = Rk4Solver;
        let eps = self.epsilon;

        let mut primary = params.initial_phase();
        let mut perturbed = primary;
        perturbed[THETA1] += eps;

        let mut log_sum = 0.0;
        let mut accumulated_steps = 0;
        let mut skipped_steps = 0;

        for _ in 0..self.steps() {
            primary = solver.advance(params, &primary, self.dt);
            perturbed = solver.advance(params, &perturbed, self.dt);

            let separation: Phase = perturbed - primary;
            let d = separation.norm();

            if d > 0.0 && d.is_finite() {
                log_sum += (d / eps).ln();
                perturbed = primary + separation * (eps / d);
                accumulated_steps += 1;
            } else {
                skipped_steps += 1;
            }
        }

        LyapunovEstimate {
            exponent: log_sum / self.duration,
            accumulated_steps,
            skipped_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pendula_math::deg_to_rad;

    fn params_at(theta1_deg: f64, theta2_deg: f64) -> Params {
        let mut params = Params::default();
        params.theta1 = deg_to_rad(theta1_deg);
        params.theta2 = deg_to_rad(theta2_deg);
        params
    }

    #[test]
    fn test_step_count() {
        let estimator = LyapunovEstimator::default();
        assert_eq!(estimator.steps(), 1000);
        let short = LyapunovEstimator {
            duration: 1.0,
            dt: 0.3,
            ..estimator
        };
        assert_eq!(short.steps(), 3);
    }

    #[test]
    fn test_equilibrium_is_stable() {
        let estimate = LyapunovEstimator::default().estimate_detailed(&params_at(0.0, 0.0));
        assert!(estimate.exponent < 0.3, "exponent {}", estimate.exponent);
        assert_eq!(estimate.skipped_steps, 0);
        assert_eq!(estimate.accumulated_steps, 1000);
    }

    #[test]
    fn test_high_energy_is_chaotic() {
        let estimator = LyapunovEstimator::default();
        let chaotic = estimator.estimate(&params_at(170.0, 170.0));
        let stable = estimator.estimate(&params_at(0.0, 0.0));
        assert!(chaotic > 0.5, "exponent {chaotic}");
        assert!(chaotic > stable);
    }

    #[test]
    fn test_non_finite_trajectory_is_skipped_not_fatal() {
        let mut params = params_at(10.0, 10.0);
        params.omega1 = f64::NAN;
        let estimate = LyapunovEstimator::default().estimate_detailed(&params);
        assert_eq!(estimate.accumulated_steps, 0);
        assert_eq!(estimate.skipped_steps, 1000);
        assert_eq!(estimate.exponent, 0.0);
    }

    #[test]
    fn test_deterministic() {
        let estimator = LyapunovEstimator::default();
        let params = params_at(120.0, -30.0);
        assert_eq!(
            estimator.estimate(&params).to_bits(),
            estimator.estimate(&params).to_bits()
        );
    }
}
