//! Planar double-pendulum dynamics for pendula.
//!
//! Implements:
//! - Closed-form Lagrangian accelerations with linear damping
//! - Forward kinematics of both bobs
//! - Kinetic/potential energy
//! - Fixed-step classical RK4 behind the [`Solver`] trait

pub mod dynamics;
pub mod energy;
pub mod integrator;
pub mod kinematics;

pub use dynamics::{accelerations, derivatives};
pub use energy::{kinetic_energy, potential_energy, total_energy};
pub use integrator::{Rk4Solver, Solver};
pub use kinematics::{BobPositions, bob_positions, bob_velocities};
