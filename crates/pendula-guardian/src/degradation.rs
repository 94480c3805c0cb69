//! Solver quality assessment.

use crate::conservation::ConservationMonitor;

/// Solver quality levels based on energy drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverQuality {
    /// Error < 0.01 * tolerance: simulation is excellent
    Excellent,
    /// 0.01 * tolerance < error < 0.1 * tolerance: good quality
    Good,
    /// 0.1 * tolerance < error < tolerance: marginal but acceptable
    Marginal,
    /// tolerance < error < 10 * tolerance: poor
    Poor,
    /// error > 10 * tolerance, or the trajectory is no longer finite
    Critical,
}

impl SolverQuality {
    /// Assess quality based on error relative to tolerance.
    pub fn assess(error: f64, tolerance: f64) -> Self {
        let ratio = error / tolerance;

        if !ratio.is_finite() {
            Self::Critical
        } else if ratio < 0.01 {
            Self::Excellent
        } else if ratio < 0.1 {
            Self::Good
        } else if ratio < 1.0 {
            Self::Marginal
        } else if ratio < 10.0 {
            Self::Poor
        } else {
            Self::Critical
        }
    }

    /// Assess quality from a conservation monitor.
    ///
    /// Only meaningful for undamped runs; damping drains energy on purpose.
    pub fn assess_from_monitor(monitor: &ConservationMonitor, tolerance: f64) -> Self {
        Self::assess(monitor.energy_error, tolerance)
    }

    /// Check if quality is acceptable (Excellent, Good, or Marginal).
    pub fn is_acceptable(&self) -> bool {
        matches!(self, Self::Excellent | Self::Good | Self::Marginal)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Marginal => "marginal",
            Self::Poor => "poor",
            Self::Critical => "critical",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_assessment() {
        let tol = 1e-3;
        assert_eq!(SolverQuality::assess(1e-6, tol), SolverQuality::Excellent);
        assert_eq!(SolverQuality::assess(5e-5, tol), SolverQuality::Good);
        assert_eq!(SolverQuality::assess(5e-4, tol), SolverQuality::Marginal);
        assert_eq!(SolverQuality::assess(5e-3, tol), SolverQuality::Poor);
        assert_eq!(SolverQuality::assess(1.0, tol), SolverQuality::Critical);
        assert_eq!(SolverQuality::assess(f64::NAN, tol), SolverQuality::Critical);
    }

    #[test]
    fn test_acceptability() {
        assert!(SolverQuality::Marginal.is_acceptable());
        assert!(!SolverQuality::Poor.is_acceptable());
        assert!(!SolverQuality::Critical.is_acceptable());
    }
}
