//! Parameter identifiers and their static metadata.
//!
//! Every tunable field of [`Params`](crate::Params) has a [`ParamId`] and a
//! [`ParamSpec`] row in a fixed table. Ranges are expressed in *external*
//! units: degrees for angles, SI for everything else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ParamError, Result};

/// Identifier of a physical parameter or initial condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParamId {
    #[serde(rename = "m1")]
    M1,
    #[serde(rename = "m2")]
    M2,
    #[serde(rename = "L1")]
    L1,
    #[serde(rename = "L2")]
    L2,
    #[serde(rename = "theta1")]
    Theta1,
    #[serde(rename = "theta2")]
    Theta2,
    #[serde(rename = "omega1")]
    Omega1,
    #[serde(rename = "omega2")]
    Omega2,
    #[serde(rename = "g")]
    G,
    #[serde(rename = "damping")]
    Damping,
}

/// Static metadata for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub id: ParamId,
    /// Short name, also the serialized form.
    pub name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Unit of the external value.
    pub unit: &'static str,
    pub default: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// External value is in degrees, internal value in radians.
    pub is_angle: bool,
    /// Decimal places used when formatting for display.
    pub decimals: usize,
}

const SPECS: [ParamSpec; 10] = [
    ParamSpec {
        id: ParamId::M1,
        name: "m1",
        label: "Mass 1",
        unit: "kg",
        default: 1.0,
        min: 0.1,
        max: 10.0,
        step: 0.1,
        is_angle: false,
        decimals: 2,
    },
    ParamSpec {
        id: ParamId::M2,
        name: "m2",
        label: "Mass 2",
        unit: "kg",
        default: 1.0,
        min: 0.1,
        max: 10.0,
        step: 0.1,
        is_angle: false,
        decimals: 2,
    },
    ParamSpec {
        id: ParamId::L1,
        name: "L1",
        label: "Length 1",
        unit: "m",
        default: 1.0,
        min: 0.1,
        max: 2.0,
        step: 0.05,
        is_angle: false,
        decimals: 2,
    },
    ParamSpec {
        id: ParamId::L2,
        name: "L2",
        label: "Length 2",
        unit: "m",
        default: 1.0,
        min: 0.1,
        max: 2.0,
        step: 0.05,
        is_angle: false,
        decimals: 2,
    },
    ParamSpec {
        id: ParamId::Theta1,
        name: "theta1",
        label: "Initial angle 1",
        unit: "°",
        default: 90.0,
        min: -180.0,
        max: 180.0,
        step: 1.0,
        is_angle: true,
        decimals: 1,
    },
    ParamSpec {
        id: ParamId::Theta2,
        name: "theta2",
        label: "Initial angle 2",
        unit: "°",
        default: 90.0,
        min: -180.0,
        max: 180.0,
        step: 1.0,
        is_angle: true,
        decimals: 1,
    },
    ParamSpec {
        id: ParamId::Omega1,
        name: "omega1",
        label: "Initial angular velocity 1",
        unit: "rad/s",
        default: 0.0,
        min: -10.0,
        max: 10.0,
        step: 0.1,
        is_angle: false,
        decimals: 1,
    },
    ParamSpec {
        id: ParamId::Omega2,
        name: "omega2",
        label: "Initial angular velocity 2",
        unit: "rad/s",
        default: 0.0,
        min: -10.0,
        max: 10.0,
        step: 0.1,
        is_angle: false,
        decimals: 1,
    },
    ParamSpec {
        id: ParamId::G,
        name: "g",
        label: "Gravity",
        unit: "m/s²",
        default: 9.81,
        min: 0.0,
        max: 20.0,
        step: 0.1,
        is_angle: false,
        decimals: 2,
    },
    ParamSpec {
        id: ParamId::Damping,
        name: "damping",
        label: "Damping",
        unit: "1/s",
        default: 0.0,
        min: 0.0,
        max: 1.0,
        step: 0.01,
        is_angle: false,
        decimals: 2,
    },
];

/// Values this far outside a range (relative to its span) are float noise
/// from the axis mapping and get clamped instead of rejected.
const RANGE_SLACK: f64 = 1e-9;

impl ParamId {
    /// All parameters in table order.
    pub const ALL: [ParamId; 10] = [
        ParamId::M1,
        ParamId::M2,
        ParamId::L1,
        ParamId::L2,
        ParamId::Theta1,
        ParamId::Theta2,
        ParamId::Omega1,
        ParamId::Omega2,
        ParamId::G,
        ParamId::Damping,
    ];

    pub fn spec(self) -> &'static ParamSpec {
        &SPECS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// One of the four fields that define the initial phase-space point.
    pub fn is_initial_condition(self) -> bool {
        matches!(
            self,
            ParamId::Theta1 | ParamId::Theta2 | ParamId::Omega1 | ParamId::Omega2
        )
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamId {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self> {
        ParamId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| ParamError::UnknownParam(s.to_string()))
    }
}

impl ParamSpec {
    /// Validate an external value, returning it clamped into range.
    pub fn check(&self, value: f64) -> Result<f64> {
        if !value.is_finite() {
            return Err(ParamError::NonFinite { param: self.id });
        }
        let slack = (self.max - self.min) * RANGE_SLACK;
        if value < self.min - slack || value > self.max + slack {
            return Err(ParamError::OutOfRange {
                param: self.id,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(value.clamp(self.min, self.max))
    }

    /// External → internal units.
    pub fn to_internal(&self, external: f64) -> f64 {
        if self.is_angle {
            pendula_math::deg_to_rad(external)
        } else {
            external
        }
    }

    /// Internal → external units.
    pub fn to_external(&self, internal: f64) -> f64 {
        if self.is_angle {
            pendula_math::rad_to_deg(internal)
        } else {
            internal
        }
    }

    /// Format an external value with the display precision.
    pub fn format(&self, external: f64) -> String {
        format!("{:.*}", self.decimals, external)
    }
}

/// A parameter that can be swept along a chaos-map axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChaosAxis {
    #[serde(rename = "theta1")]
    Theta1,
    #[serde(rename = "theta2")]
    Theta2,
    #[serde(rename = "omega1")]
    Omega1,
    #[serde(rename = "omega2")]
    Omega2,
}

impl ChaosAxis {
    pub const ALL: [ChaosAxis; 4] = [
        ChaosAxis::Theta1,
        ChaosAxis::Theta2,
        ChaosAxis::Omega1,
        ChaosAxis::Omega2,
    ];

    pub fn param(self) -> ParamId {
        match self {
            ChaosAxis::Theta1 => ParamId::Theta1,
            ChaosAxis::Theta2 => ParamId::Theta2,
            ChaosAxis::Omega1 => ParamId::Omega1,
            ChaosAxis::Omega2 => ParamId::Omega2,
        }
    }

    pub fn spec(self) -> &'static ParamSpec {
        self.param().spec()
    }
}

impl TryFrom<ParamId> for ChaosAxis {
    type Error = ParamError;

    fn try_from(id: ParamId) -> Result<Self> {
        match id {
            ParamId::Theta1 => Ok(ChaosAxis::Theta1),
            ParamId::Theta2 => Ok(ChaosAxis::Theta2),
            ParamId::Omega1 => Ok(ChaosAxis::Omega1),
            ParamId::Omega2 => Ok(ChaosAxis::Omega2),
            other => Err(ParamError::NotAnAxis(other)),
        }
    }
}

impl FromStr for ChaosAxis {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self> {
        ChaosAxis::try_from(s.parse::<ParamId>()?)
    }
}

impl fmt::Display for ChaosAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.param().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_id() {
        for id in ParamId::ALL {
            assert_eq!(id.spec().id, id);
            assert!(id.spec().min < id.spec().max);
            let d = id.spec().default;
            assert!(d >= id.spec().min && d <= id.spec().max);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("L1".parse::<ParamId>().unwrap(), ParamId::L1);
        assert_eq!("theta2".parse::<ParamId>().unwrap(), ParamId::Theta2);
        assert!(matches!(
            "l1".parse::<ParamId>(),
            Err(ParamError::UnknownParam(_))
        ));
        assert!(matches!(
            "g".parse::<ChaosAxis>(),
            Err(ParamError::NotAnAxis(ParamId::G))
        ));
    }

    #[test]
    fn test_check_range() {
        let spec = ParamId::L1.spec();
        assert_eq!(spec.check(1.5).unwrap(), 1.5);
        assert!(matches!(
            spec.check(0.0),
            Err(ParamError::OutOfRange { .. })
        ));
        assert!(matches!(
            spec.check(f64::NAN),
            Err(ParamError::NonFinite { .. })
        ));
        // Float noise just past the bound is clamped, not rejected.
        let noisy = 180.0 + 1e-12;
        assert_eq!(ParamId::Theta1.spec().check(noisy).unwrap(), 180.0);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ParamId::L2).unwrap();
        assert_eq!(json, "\"L2\"");
        let axis: ChaosAxis = serde_json::from_str("\"omega1\"").unwrap();
        assert_eq!(axis, ChaosAxis::Omega1);
    }

    #[test]
    fn test_initial_condition_fields() {
        let ic: Vec<_> = ParamId::ALL
            .into_iter()
            .filter(|id| id.is_initial_condition())
            .collect();
        assert_eq!(
            ic,
            vec![ParamId::Theta1, ParamId::Theta2, ParamId::Omega1, ParamId::Omega2]
        );
    }
}
