//! Physical parameters and initial conditions.

use pendula_math::Phase;

use crate::{ParamId, Result};

/// Physical description of a planar double pendulum plus its initial state.
///
/// Angles are stored in radians. Use [`Params::set_external`] /
/// [`Params::get_external`] to work in the degree-based external units.
///
/// Invariant: `m1, m2, l1, l2 > 0`. The constructors and setters in this
/// module enforce it; code that writes the public fields directly must call
/// [`Params::validate`] before handing the value to the dynamics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    /// Mass of the first bob (kg).
    pub m1: f64,
    /// Mass of the second bob (kg).
    pub m2: f64,
    /// Length of the first rod (m).
    pub l1: f64,
    /// Length of the second rod (m).
    pub l2: f64,
    /// Initial angle of the first rod from the downward vertical (rad).
    pub theta1: f64,
    /// Initial angle of the second rod from the downward vertical (rad).
    pub theta2: f64,
    /// Initial angular velocity of the first rod (rad/s).
    pub omega1: f64,
    /// Initial angular velocity of the second rod (rad/s).
    pub omega2: f64,
    /// Gravitational acceleration (m/s²).
    pub g: f64,
    /// Linear damping coefficient (1/s).
    pub damping: f64,
}

impl Default for Params {
    fn default() -> Self {
        let mut params = Self {
            m1: 0.0,
            m2: 0.0,
            l1: 0.0,
            l2: 0.0,
            theta1: 0.0,
            theta2: 0.0,
            omega1: 0.0,
            omega2: 0.0,
            g: 0.0,
            damping: 0.0,
        };
        for id in ParamId::ALL {
            let spec = id.spec();
            params.set(id, spec.to_internal(spec.default));
        }
        params
    }
}

impl Params {
    /// Value in internal units (radians for angles).
    pub fn get(&self, id: ParamId) -> f64 {
        match id {
            ParamId::M1 => self.m1,
            ParamId::M2 => self.m2,
            ParamId::L1 => self.l1,
            ParamId::L2 => self.l2,
            ParamId::Theta1 => self.theta1,
            ParamId::Theta2 => self.theta2,
            ParamId::Omega1 => self.omega1,
            ParamId::Omega2 => self.omega2,
            ParamId::G => self.g,
            ParamId::Damping => self.damping,
        }
    }

    /// Write a value in internal units without validation.
    pub fn set(&mut self, id: ParamId, value: f64) {
        let slot = match id {
            ParamId::M1 => &mut self.m1,
            ParamId::M2 => &mut self.m2,
            ParamId::L1 => &mut self.l1,
            ParamId::L2 => &mut self.l2,
            ParamId::Theta1 => &mut self.theta1,
            ParamId::Theta2 => &mut self.theta2,
            ParamId::Omega1 => &mut self.omega1,
            ParamId::Omega2 => &mut self.omega2,
            ParamId::G => &mut self.g,
            ParamId::Damping => &mut self.damping,
        };
        *slot = value;
    }

    /// Value in external units (degrees for angles).
    pub fn get_external(&self, id: ParamId) -> f64 {
        id.spec().to_external(self.get(id))
    }

    /// Validate an external value against the parameter table and store it.
    ///
    /// On error `self` is left untouched.
    pub fn set_external(&mut self, id: ParamId, value: f64) -> Result<()> {
        let spec = id.spec();
        let value = spec.check(value)?;
        self.set(id, spec.to_internal(value));
        Ok(())
    }

    /// Check every field against the parameter table.
    pub fn validate(&self) -> Result<()> {
        for id in ParamId::ALL {
            id.spec().check(self.get_external(id))?;
        }
        Ok(())
    }

    /// Initial phase-space point `(θ1, θ2, ω1, ω2)`.
    pub fn initial_phase(&self) -> Phase {
        Phase::new(self.theta1, self.theta2, self.omega1, self.omega2)
    }

    /// All parameters with their external values, in table order.
    pub fn external_values(&self) -> [(ParamId, f64); 10] {
        ParamId::ALL.map(|id| (id, self.get_external(id)))
    }
}
