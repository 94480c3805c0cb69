//! Energy conservation monitoring.
//!
//! Tracks mechanical energy against a baseline to detect numerical drift,
//! sign errors in the dynamics and blow-ups.

use pendula_math::Phase;
use pendula_model::Params;
use pendula_rigid::total_energy;

/// Baseline quantities to track drift.
#[derive(Debug, Clone, Copy)]
pub struct ConservationState {
    pub baseline_energy: f64,
}

impl ConservationState {
    /// Initialize from the current parameters and phase.
    pub fn new(params: &Params, phase: &Phase) -> Self {
        Self {
            baseline_energy: total_energy(params, phase),
        }
    }
}

/// Conservation errors at the current step.
#[derive(Debug, Clone, Copy)]
pub struct ConservationMonitor {
    /// Total mechanical energy now.
    pub energy: f64,
    /// Relative energy error: |E - E₀| / |E₀| (absolute when E₀ ≈ 0).
    pub energy_error: f64,
}

impl ConservationMonitor {
    /// Check energy against the baseline.
    pub fn check(baseline: &ConservationState, params: &Params, phase: &Phase) -> Self {
        let energy = total_energy(params, phase);
        let e0 = baseline.baseline_energy;

        // Relative energy error (avoid division by zero)
        let energy_error = if e0.abs() > 1e-12 {
            (energy - e0).abs() / e0.abs()
        } else {
            (energy - e0).abs()
        };

        Self {
            energy,
            energy_error,
        }
    }

    /// Check if drift exceeds `energy_tol`. Non-finite energy always counts.
    pub fn is_violated(&self, energy_tol: f64) -> bool {
        !self.energy_error.is_finite() || self.energy_error > energy_tol
    }
}

/// Checks that energy never rises between consecutive samples.
///
/// With linear damping `dE/dt = -c ωᵀMω ≤ 0`, so any increase beyond the
/// tolerance points at an integration or sign error.
#[derive(Debug, Clone)]
pub struct EnergyDecayTracker {
    last: f64,
    tolerance: f64,
    /// Largest relative increase seen between consecutive samples.
    pub worst_increase: f64,
    pub samples: usize,
}

impl EnergyDecayTracker {
    pub fn new(params: &Params, phase: &Phase, tolerance: f64) -> Self {
        Self {
            last: total_energy(params, phase),
            tolerance,
            worst_increase: 0.0,
            samples: 1,
        }
    }

    /// Record a sample; returns false if energy increased beyond tolerance.
    pub fn record(&mut self, params: &Params, phase: &Phase) -> bool {
        let e = total_energy(params, phase);
        let scale = self.last.abs().max(1e-12);
        let increase = (e - self.last) / scale;
        self.worst_increase = self.worst_increase.max(increase);
        self.last = e;
        self.samples += 1;
        increase <= self.tolerance
    }

    /// True if no sample so far broke monotonic decay.
    pub fn is_monotonic(&self) -> bool {
        self.worst_increase <= self.tolerance
    }
}
