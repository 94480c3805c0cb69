//! Math primitives for the pendula double-pendulum engine.
//!
//! The phase-space state of a planar double pendulum is a 4-vector
//! `(θ1, θ2, ω1, ω2)`. Positions are 2-vectors in the pendulum plane with
//! `x` to the right and `y` pointing *down* (screen convention), measured
//! from the pivot.

use nalgebra as na;

/// Phase-space vector `(θ1, θ2, ω1, ω2)`.
pub type Phase = na::Vector4<f64>;
/// 2D vector alias.
pub type Vec2 = na::Vector2<f64>;

/// Standard gravity (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Index of θ1 in a [`Phase`].
pub const THETA1: usize = 0;
/// Index of θ2 in a [`Phase`].
pub const THETA2: usize = 1;
/// Index of ω1 in a [`Phase`].
pub const OMEGA1: usize = 2;
/// Index of ω2 in a [`Phase`].
pub const OMEGA2: usize = 3;

/// Degrees → radians.
#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Radians → degrees.
#[inline]
pub fn rad_to_deg(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Linearly map `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// No clamping; the output range may be reversed (`out_min > out_max`).
#[inline]
pub fn map_range(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// True if every component of the phase vector is finite.
#[inline]
pub fn is_finite_phase(phase: &Phase) -> bool {
    phase.iter().all(|c| c.is_finite())
}
