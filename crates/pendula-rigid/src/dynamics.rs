//! Equations of motion.
//!
//! Point masses on massless rods, angles measured from the downward
//! vertical. The denominator `2·m1 + m2 − m2·cos(2δ)` is bounded below by
//! `2·m1`, but with `m2 ≫ m1` and δ near 0 or π it gets small relative to the
//! numerators and accelerations become very large. That is a property of the
//! model; nothing here guards against it and extreme parameter combinations
//! can produce numerically unstable (even non-finite) trajectories.

use pendula_math::{OMEGA1, OMEGA2, Phase, THETA1, THETA2};
use pendula_model::Params;

/// Angular accelerations `(α1, α2)` at a phase-space point, damping included.
pub fn accelerations(params: &Params, phase: &Phase) -> (f64, f64) {
    let Params {
        m1,
        m2,
        l1,
        l2,
        g,
        damping,
        ..
    } = *params;
    let (theta1, theta2) = (phase[THETA1], phase[THETA2]);
    let (omega1, omega2) = (phase[OMEGA1], phase[OMEGA2]);

    let delta = theta1 - theta2;
    let (sin_delta, cos_delta) = delta.sin_cos();
    let denom = 2.0 * m1 + m2 - m2 * (2.0 * delta).cos();

    let num1 = -g * (2.0 * m1 + m2) * theta1.sin()
        - m2 * g * (theta1 - 2.0 * theta2).sin()
        - 2.0 * sin_delta * m2 * (omega2 * omega2 * l2 + omega1 * omega1 * l1 * cos_delta);
    let alpha1 = num1 / (l1 * denom);

    let num2 = 2.0
        * sin_delta
        * (omega1 * omega1 * l1 * (m1 + m2)
            + g * (m1 + m2) * theta1.cos()
            + omega2 * omega2 * l2 * m2 * cos_delta);
    let alpha2 = num2 / (l2 * denom);

    (alpha1 - damping * omega1, alpha2 - damping * omega2)
}

/// Time derivative of the phase vector: `(ω1, ω2, α1, α2)`.
pub fn derivatives(params: &Params, phase: &Phase) -> Phase {
    let (alpha1, alpha2) = accelerations(params, phase);
    Phase::new(phase[OMEGA1], phase[OMEGA2], alpha1, alpha2)
}
