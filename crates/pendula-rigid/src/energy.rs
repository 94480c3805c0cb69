//! Energy computation for the double pendulum.

use pendula_math::Phase;
use pendula_model::Params;

use crate::kinematics::{bob_positions, bob_velocities};

/// Compute kinetic energy: 0.5 * sum_i m_i |v_i|^2
pub fn kinetic_energy(params: &Params, phase: &Phase) -> f64 {
    let (v1, v2) = bob_velocities(params, phase);
    0.5 * params.m1 * v1.norm_squared() + 0.5 * params.m2 * v2.norm_squared()
}

/// Compute gravitational potential energy, zero at the pivot height.
///
/// `y` points down, so PE = -sum_i m_i * g * y_i.
pub fn potential_energy(params: &Params, phase: &Phase) -> f64 {
    let pos = bob_positions(params, phase);
    -params.g * (params.m1 * pos.mass1.y + params.m2 * pos.mass2.y)
}

/// Total mechanical energy (kinetic + potential).
pub fn total_energy(params: &Params, phase: &Phase) -> f64 {
    kinetic_energy(params, phase) + potential_energy(params, phase)
}
